//! Dimension probe
//!
//! A docked developer-tools panel widens the gap between the browser
//! chrome's outer extents and the page viewport. An excess over the
//! threshold on either axis fires. Undocked tools leave the gap untouched
//! and are not seen by this probe.

use crate::detect::{DetectionSignal, Probe, SignalKind};
use crate::page::Page;

/// Fires when the outer/inner window delta exceeds the threshold on
/// either axis.
pub struct DimensionProbe {
    threshold_px: u32,
}

impl DimensionProbe {
    pub fn new(threshold_px: u32) -> Self {
        Self { threshold_px }
    }
}

impl Probe for DimensionProbe {
    fn name(&self) -> &'static str {
        "dimension"
    }

    fn probe(&mut self, page: &Page) -> Option<DetectionSignal> {
        let (delta_w, delta_h) = page.window.chrome_delta();
        let measured = delta_w.max(delta_h);
        if measured <= self.threshold_px {
            return None;
        }
        Some(DetectionSignal {
            kind: SignalKind::Dimension,
            measured: measured as u64,
            threshold: self.threshold_px as u64,
            evidence: format!(
                "window chrome delta {}x{} px exceeds {} px",
                delta_w, delta_h, self.threshold_px
            ),
        })
    }
}
