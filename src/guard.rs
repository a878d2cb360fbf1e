//! Guard runtime
//!
//! The process-wide context that owns the protection state machine and the
//! detection engine. One [`Guard`] is created per page, installed once,
//! and then driven by the enforcement scheduler; there is no reset and no
//! unprotect operation.

use crate::detect::{DetectionEngine, DimensionProbe, Probe};
use crate::lockdown::{LockdownReason, LockdownRenderer, ProtectionState};
use crate::page::{GuardMarker, Page};
use crate::{intercept, neutralize, GuardConfig};

/// Anti-inspection guard for one page.
pub struct Guard {
    config: GuardConfig,
    state: ProtectionState,
    engine: DetectionEngine,
}

impl Guard {
    pub fn new(config: GuardConfig) -> Self {
        let engine = DetectionEngine::new(&config);
        Self {
            config,
            state: ProtectionState::Armed,
            engine,
        }
    }

    /// Register an additional detection heuristic.
    pub fn with_probe(mut self, probe: Box<dyn Probe>) -> Self {
        self.engine = self.engine.with_probe(probe);
        self
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn state(&self) -> ProtectionState {
        self.state
    }

    pub fn is_locked_down(&self) -> bool {
        self.state == ProtectionState::LockedDown
    }

    /// Synchronous installation at script-load time: arm the interceptors,
    /// neutralize the diagnostic globals, publish the marker, and run the
    /// install-time dimension pre-check so tools already open are caught
    /// before the first enforcement tick.
    pub fn install(&mut self, page: &mut Page) {
        tracing::info!("installing anti-inspection guard");
        intercept::arm(page);
        neutralize::neutralize(page);
        page.globals.publish_marker(GuardMarker::current());

        let mut precheck = DimensionProbe::new(self.config.dimension_threshold_px);
        if let Some(signal) = precheck.probe(page) {
            self.lockdown(page, LockdownReason::Signal(signal));
        }
    }

    /// One enforcement tick: re-arm, re-neutralize, then detect. Fixed
    /// order; a fired signal feeds the lockdown renderer, which is a no-op
    /// once the page is locked down.
    pub fn tick(&mut self, page: &mut Page) {
        intercept::arm(page);
        neutralize::neutralize(page);
        if let Some(signal) = self.engine.detect(page) {
            self.lockdown(page, LockdownReason::Signal(signal));
        }
    }

    /// Page-load hook: unconditional hard reset of the document to the
    /// inert shell, whether or not any probe has fired.
    pub fn on_load(&mut self, page: &mut Page) {
        self.lockdown(page, LockdownReason::LoadReset);
    }

    /// Terminal ARMED → LOCKED_DOWN transition. Idempotent.
    pub fn lockdown(&mut self, page: &mut Page, reason: LockdownReason) {
        LockdownRenderer::apply(&mut self.state, page, reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neutralize::fully_neutralized;
    use crate::page::EventKind;

    #[test]
    fn test_install_arms_neutralizes_and_publishes_marker() {
        let mut guard = Guard::new(GuardConfig::default());
        let mut page = Page::new();

        guard.install(&mut page);

        assert!(page.has_tagged_listener(EventKind::KeyDown, "vigil"));
        assert!(fully_neutralized(&page));
        let marker = page.globals.marker().expect("marker published");
        assert!(marker.protected);
        assert_eq!(guard.state(), ProtectionState::Armed);
    }

    #[test]
    fn test_install_precheck_catches_already_open_tools() {
        let mut guard = Guard::new(GuardConfig::default());
        let mut page = Page::with_body("<main>app</main>");
        page.window.outer_width = page.window.inner_width + 300;

        guard.install(&mut page);

        assert!(guard.is_locked_down());
        assert!(page.body().contains("Access Denied"));
    }

    #[test]
    fn test_tick_reattaches_stripped_listeners() {
        let mut guard = Guard::new(GuardConfig::default());
        let mut page = Page::new();
        guard.install(&mut page);

        page.clear_listeners(EventKind::ContextMenu);
        assert!(!page.has_tagged_listener(EventKind::ContextMenu, "vigil"));

        guard.tick(&mut page);
        assert!(page.has_tagged_listener(EventKind::ContextMenu, "vigil"));
        assert_eq!(page.listener_count(EventKind::ContextMenu), 1);
    }

    #[test]
    fn test_on_load_is_terminal_and_ticks_never_reverse_it() {
        let mut guard = Guard::new(GuardConfig::default());
        let mut page = Page::with_body("<main id=\"app\">app</main>");
        guard.install(&mut page);

        guard.on_load(&mut page);
        assert!(guard.is_locked_down());
        let body = page.body().to_string();

        for _ in 0..3 {
            guard.tick(&mut page);
        }
        assert!(guard.is_locked_down());
        assert_eq!(page.body(), body);
    }
}
