//! Timing probe
//!
//! Measures wall-clock time across a breakpoint statement. An attached
//! debugger that honors breakpoints pauses execution there while a human
//! steps, stretching the elapsed time far past the statement's real cost.
//!
//! Known limitations, kept as-is: headless or instrumented tools that
//! ignore breakpoints are not seen (false negative), and heavy main-thread
//! contention can stretch the measurement on its own (false positive).

use std::hint::black_box;
use std::time::{Duration, Instant};

use crate::detect::{DetectionSignal, Probe, SignalKind};
use crate::page::Page;

/// The breakpoint seam the timing probe measures across.
///
/// `trip` executes one breakpoint statement and reports the wall-clock
/// time that passed around it. Tests substitute a fixed-duration trap.
pub trait DebuggerTrap: Send {
    fn trip(&mut self) -> Duration;
}

/// Production trap: a short opaque spin standing in for the breakpoint
/// statement, bracketed by `Instant` reads. Unpaused, it costs
/// microseconds; a debugger holding the breakpoint shows up as the full
/// pause duration.
pub struct BreakpointTrap {
    spin_iterations: u32,
}

impl Default for BreakpointTrap {
    fn default() -> Self {
        Self {
            spin_iterations: 10_000,
        }
    }
}

impl DebuggerTrap for BreakpointTrap {
    fn trip(&mut self) -> Duration {
        let start = Instant::now();
        let mut acc: u64 = 0;
        for i in 0..self.spin_iterations {
            acc = black_box(acc.wrapping_add(i as u64));
        }
        black_box(acc);
        start.elapsed()
    }
}

/// Fires when the elapsed time across the trap exceeds the threshold.
pub struct TimingProbe {
    threshold: Duration,
    trap: Box<dyn DebuggerTrap>,
}

impl TimingProbe {
    pub fn new(threshold: Duration) -> Self {
        Self::with_trap(threshold, Box::new(BreakpointTrap::default()))
    }

    pub fn with_trap(threshold: Duration, trap: Box<dyn DebuggerTrap>) -> Self {
        Self { threshold, trap }
    }
}

impl Probe for TimingProbe {
    fn name(&self) -> &'static str {
        "timing"
    }

    fn probe(&mut self, _page: &Page) -> Option<DetectionSignal> {
        let elapsed = self.trap.trip();
        if elapsed <= self.threshold {
            return None;
        }
        Some(DetectionSignal {
            kind: SignalKind::Timing,
            measured: elapsed.as_millis() as u64,
            threshold: self.threshold.as_millis() as u64,
            evidence: format!(
                "breakpoint held for {}ms (threshold {}ms)",
                elapsed.as_millis(),
                self.threshold.as_millis()
            ),
        })
    }
}
