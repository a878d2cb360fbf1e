//! Developer-tools detection heuristics
//!
//! Each heuristic is an independent [`Probe`] returning a uniform
//! [`DetectionSignal`]; the engine polls them in order and reports the
//! first one that fires. New heuristics slot in through
//! [`DetectionEngine::with_probe`] without touching the scheduler or the
//! lockdown renderer.

pub mod dimension;
pub mod timing;

pub use dimension::DimensionProbe;
pub use timing::{BreakpointTrap, DebuggerTrap, TimingProbe};

use serde::{Deserialize, Serialize};

use crate::page::Page;
use crate::GuardConfig;

/// Heuristic family that produced a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalKind {
    /// Wall-clock stretch across a breakpoint statement.
    Timing,
    /// Outer/inner window-size discrepancy.
    Dimension,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Timing => "timing",
            SignalKind::Dimension => "dimension",
        }
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one fired heuristic evaluation. Ephemeral: consumed by the
/// lockdown transition, not retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionSignal {
    pub kind: SignalKind,
    /// Measured value, in the probe's unit (ms or px).
    pub measured: u64,
    /// Threshold the measurement exceeded, same unit.
    pub threshold: u64,
    pub evidence: String,
}

/// A single dev-tools heuristic.
pub trait Probe: Send {
    fn name(&self) -> &'static str;

    /// Evaluate once. `Some` means the heuristic fired.
    fn probe(&mut self, page: &Page) -> Option<DetectionSignal>;
}

/// Polls the registered probes once per enforcement tick.
pub struct DetectionEngine {
    probes: Vec<Box<dyn Probe>>,
}

impl DetectionEngine {
    /// Engine with the stock probes (timing + dimension) at the
    /// configured thresholds.
    pub fn new(config: &GuardConfig) -> Self {
        Self {
            probes: vec![
                Box::new(TimingProbe::new(config.timing_threshold)),
                Box::new(DimensionProbe::new(config.dimension_threshold_px)),
            ],
        }
    }

    /// Add a custom heuristic.
    pub fn with_probe(mut self, probe: Box<dyn Probe>) -> Self {
        self.probes.push(probe);
        self
    }

    /// Run all probes; first fired signal wins.
    pub fn detect(&mut self, page: &Page) -> Option<DetectionSignal> {
        for probe in &mut self.probes {
            if let Some(signal) = probe.probe(page) {
                tracing::warn!(
                    probe = probe.name(),
                    kind = %signal.kind,
                    measured = signal.measured,
                    threshold = signal.threshold,
                    "detection probe fired"
                );
                return Some(signal);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct AlwaysFires;

    impl Probe for AlwaysFires {
        fn name(&self) -> &'static str {
            "always"
        }

        fn probe(&mut self, _page: &Page) -> Option<DetectionSignal> {
            Some(DetectionSignal {
                kind: SignalKind::Timing,
                measured: 1,
                threshold: 0,
                evidence: "test probe".to_string(),
            })
        }
    }

    #[test]
    fn test_stock_engine_quiet_on_untouched_page() {
        let config = GuardConfig::default();
        // A trap this fast never trips the timing threshold, and the
        // default window has no chrome delta.
        let mut engine = DetectionEngine {
            probes: vec![
                Box::new(TimingProbe::with_trap(
                    config.timing_threshold,
                    Box::new(timing::tests::FixedTrap(Duration::from_millis(1))),
                )),
                Box::new(DimensionProbe::new(config.dimension_threshold_px)),
            ],
        };
        assert!(engine.detect(&Page::new()).is_none());
    }

    #[test]
    fn test_custom_probe_is_polled() {
        let config = GuardConfig::default();
        let mut engine = DetectionEngine::new(&config).with_probe(Box::new(AlwaysFires));
        // The stock timing probe may cost a few microseconds but will not
        // fire; the custom probe must be reached and reported.
        let signal = engine.detect(&Page::new()).expect("custom probe fires");
        assert_eq!(signal.evidence, "test probe");
    }
}
