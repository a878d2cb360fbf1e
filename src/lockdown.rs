//! Lockdown Renderer
//!
//! The single terminal exit for the guard. Both the detection-triggered
//! lockdown and the unconditional load-time reset go through
//! [`LockdownRenderer::apply`], parameterized by the triggering reason.
//! The transition is one-way: once [`ProtectionState::LockedDown`], every
//! later call is a no-op and nothing ever restores the original content.

use crate::detect::DetectionSignal;
use crate::page::{DocumentContent, Page};

/// Lifecycle of the guarded page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectionState {
    /// Countermeasures active, content live.
    Armed,
    /// Content replaced; terminal for the page's lifetime.
    LockedDown,
}

/// Why the page was locked down.
#[derive(Debug, Clone)]
pub enum LockdownReason {
    /// A detection probe fired.
    Signal(DetectionSignal),
    /// The unconditional hard reset on the page's load event.
    LoadReset,
}

impl std::fmt::Display for LockdownReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LockdownReason::Signal(signal) => {
                write!(f, "{} probe: {}", signal.kind, signal.evidence)
            }
            LockdownReason::LoadReset => f.write_str("load-time reset"),
        }
    }
}

/// Full-viewport denial notice shown when a probe fires.
pub const ACCESS_DENIED_BODY: &str = "\
<div class=\"vigil-denied\">\
<div class=\"vigil-denied-inner\">\
<h1>Access Denied</h1>\
<p>Developer tools are not permitted on this site.</p>\
<p>Please close all developer tools and refresh the page.</p>\
</div>\
</div>";

const ACCESS_DENIED_TITLE: &str = "Access Denied";

const ACCESS_DENIED_STYLE: &str = "\
.vigil-denied { position: fixed; top: 0; left: 0; width: 100%; height: 100%; \
background: #fff; display: flex; align-items: center; justify-content: center; \
font-family: Arial, sans-serif; z-index: 9999999; }\n\
.vigil-denied-inner { text-align: center; padding: 20px; }\n\
.vigil-denied h1 { color: red; }";

/// Minimal inert shell swapped in by the load-time reset: a mount point
/// and nothing else.
pub const INERT_SHELL_BODY: &str = "<div id=\"root\"></div>";

const INERT_SHELL_STYLE: &str =
    "body { margin: 0; padding: 0; background: #f8f9fa; font-family: Arial, sans-serif; }";

/// Performs the one-way ARMED → LOCKED_DOWN transition.
pub struct LockdownRenderer;

impl LockdownRenderer {
    /// Replace the live document and mark the page locked down.
    ///
    /// Idempotent and no-throw: when already locked down this performs no
    /// DOM mutation. The replacement document is fully assembled before
    /// the swap, so the page is never partially replaced.
    pub fn apply(state: &mut ProtectionState, page: &mut Page, reason: LockdownReason) {
        if *state == ProtectionState::LockedDown {
            return;
        }

        let replacement = match &reason {
            LockdownReason::Signal(_) => DocumentContent {
                title: ACCESS_DENIED_TITLE.to_string(),
                styles: vec![ACCESS_DENIED_STYLE.to_string()],
                body: ACCESS_DENIED_BODY.to_string(),
            },
            // The shell keeps the hosting page's title; everything else is
            // the fixed inert document.
            LockdownReason::LoadReset => DocumentContent {
                title: page.title().to_string(),
                styles: vec![INERT_SHELL_STYLE.to_string()],
                body: INERT_SHELL_BODY.to_string(),
            },
        };

        page.replace_document(replacement);
        *state = ProtectionState::LockedDown;
        tracing::info!(reason = %reason, "page locked down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::SignalKind;

    fn timing_signal() -> DetectionSignal {
        DetectionSignal {
            kind: SignalKind::Timing,
            measured: 150,
            threshold: 100,
            evidence: "breakpoint held for 150ms (threshold 100ms)".to_string(),
        }
    }

    #[test]
    fn test_signal_lockdown_replaces_content_and_halts_loading() {
        let mut state = ProtectionState::Armed;
        let mut page = Page::with_body("<main id=\"app\">secret</main>");

        LockdownRenderer::apply(&mut state, &mut page, LockdownReason::Signal(timing_signal()));

        assert_eq!(state, ProtectionState::LockedDown);
        assert!(page.body().contains("Access Denied"));
        assert!(!page.body().contains("secret"));
        assert!(!page.is_loading());
    }

    #[test]
    fn test_second_apply_mutates_nothing() {
        let mut state = ProtectionState::Armed;
        let mut page = Page::new();
        LockdownRenderer::apply(&mut state, &mut page, LockdownReason::Signal(timing_signal()));

        let body = page.body().to_string();
        let styles = page.styles().to_vec();
        let title = page.title().to_string();

        LockdownRenderer::apply(&mut state, &mut page, LockdownReason::LoadReset);

        assert_eq!(page.body(), body);
        assert_eq!(page.styles(), styles.as_slice());
        assert_eq!(page.title(), title);
        assert_eq!(state, ProtectionState::LockedDown);
    }

    #[test]
    fn test_load_reset_renders_inert_shell() {
        let mut state = ProtectionState::Armed;
        let mut page = Page::with_body("<main id=\"app\">app</main>");
        page.set_title("Student Records");

        LockdownRenderer::apply(&mut state, &mut page, LockdownReason::LoadReset);

        assert_eq!(page.body(), INERT_SHELL_BODY);
        assert_eq!(page.title(), "Student Records");
        assert_eq!(state, ProtectionState::LockedDown);
    }
}
