//! # Vigil
//!
//! Runtime anti-inspection guard for embedded pages.
//!
//! Vigil deters casual inspection of a page's client-side source: it
//! swallows the input gestures that open developer tools, neutralizes the
//! diagnostic globals (console, eval, the callable-code constructor,
//! shadow attachment, the webdriver flag), polls dev-tools heuristics on a
//! fixed cadence, and replaces the live document with an inert lockdown
//! view when a heuristic fires — or unconditionally on page load.
//!
//! This is a deterrent, not a security boundary: it assumes a
//! cooperative-but-curious user, not an adversary with unrestricted local
//! tooling.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tokio::sync::Mutex;
//! use vigil::{boot, Event, Guard, GuardConfig, Page};
//!
//! #[tokio::main]
//! async fn main() {
//!     // The embedding application mounts its content into the page.
//!     let page = Arc::new(Mutex::new(Page::with_body("<main id=\"app\">…</main>")));
//!     let guard = Arc::new(Mutex::new(Guard::new(GuardConfig::default())));
//!
//!     // Install countermeasures and start the enforcement loop.
//!     boot(guard.clone(), page.clone()).await;
//!
//!     // Forward host events into the page; the guard's capturing
//!     // handlers see them first.
//!     let event = page.lock().await.dispatch(Event::contextmenu());
//!     assert!(event.default_prevented());
//!
//!     // Wire the page's load event to the hard reset.
//!     guard.lock().await.on_load(&mut *page.lock().await);
//! }
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use std::time::Duration;
//! use vigil::GuardConfig;
//!
//! let config = GuardConfig {
//!     timing_threshold: Duration::from_millis(150),
//!     ..Default::default()
//! };
//! # let _ = config;
//! ```

pub mod detect;
pub mod error;
pub mod guard;
pub mod intercept;
pub mod lockdown;
pub mod neutralize;
pub mod page;
pub mod scheduler;

// Re-exports
pub use detect::{
    DetectionEngine, DetectionSignal, DimensionProbe, Probe, SignalKind, TimingProbe,
};
pub use error::{Error, Result};
pub use guard::Guard;
pub use lockdown::{LockdownReason, LockdownRenderer, ProtectionState};
pub use page::{Event, EventKind, GuardMarker, Modifiers, NeutralizedApi, Page};
pub use scheduler::{boot, Scheduler};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the guard's thresholds and cadence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Period of the enforcement scheduler
    pub tick_interval: Duration,
    /// Elapsed time across the breakpoint statement treated as a paused
    /// debugger
    pub timing_threshold: Duration,
    /// Outer/inner window delta treated as a docked tools panel
    pub dimension_threshold_px: u32,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            timing_threshold: Duration::from_millis(100),
            dimension_threshold_px: 200,
        }
    }
}

impl GuardConfig {
    /// Looser thresholds and a slower cadence, for hosts where false
    /// positives (main-thread contention, unusual chrome) hurt more than
    /// late detection.
    pub fn lenient() -> Self {
        Self {
            tick_interval: Duration::from_secs(5),
            timing_threshold: Duration::from_millis(250),
            dimension_threshold_px: 400,
        }
    }
}
