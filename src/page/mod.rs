//! Host page model
//!
//! The document surface the guard operates on. The embedding application
//! builds a [`Page`], mounts its markup into it, binds its script hooks,
//! and forwards host events into the guard. The guard owns this surface
//! exclusively once installed: listeners, head styles, diagnostic globals
//! and the body markup are all reachable (and replaceable) from here.

pub mod events;
pub mod globals;

pub use events::{Event, EventData, EventHandler, EventKind, KeyData, ListenerRegistry, Modifiers};
pub use globals::{
    CodeHook, Console, ConsoleLevel, Globals, GuardMarker, NeutralizedApi, ShadowRoot,
};

use crate::error::Result;

/// Browser chrome extents for the window hosting the page.
///
/// `outer` includes the browser chrome; a docked developer-tools panel
/// shows up as a large outer/inner discrepancy.
#[derive(Debug, Clone, Copy)]
pub struct WindowMetrics {
    pub inner_width: u32,
    pub inner_height: u32,
    pub outer_width: u32,
    pub outer_height: u32,
}

impl Default for WindowMetrics {
    fn default() -> Self {
        Self {
            inner_width: 1280,
            inner_height: 720,
            outer_width: 1280,
            outer_height: 720,
        }
    }
}

impl WindowMetrics {
    /// (width, height) excess of the chrome over the viewport.
    pub fn chrome_delta(&self) -> (u32, u32) {
        (
            self.outer_width.saturating_sub(self.inner_width),
            self.outer_height.saturating_sub(self.inner_height),
        )
    }
}

/// A fully assembled replacement document.
///
/// Lockdown paths build one of these completely before swapping it in, so
/// the page is never observable in a partially replaced state.
#[derive(Debug, Clone)]
pub struct DocumentContent {
    pub title: String,
    pub styles: Vec<String>,
    pub body: String,
}

/// The hosted page.
pub struct Page {
    title: String,
    head_styles: Vec<String>,
    body: String,
    loading: bool,
    pub window: WindowMetrics,
    pub globals: Globals,
    listeners: ListenerRegistry,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            head_styles: Vec::new(),
            body: String::new(),
            loading: true,
            window: WindowMetrics::default(),
            globals: Globals::default(),
            listeners: ListenerRegistry::new(),
        }
    }

    /// Build a page with application markup already mounted.
    pub fn with_body(body: impl Into<String>) -> Self {
        let mut page = Self::new();
        page.body = body.into();
        page
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    /// Head style rules in insertion order.
    pub fn styles(&self) -> &[String] {
        &self.head_styles
    }

    pub fn has_style(&self, css: &str) -> bool {
        self.head_styles.iter().any(|s| s == css)
    }

    pub fn insert_style(&mut self, css: impl Into<String>) {
        self.head_styles.push(css.into());
    }

    /// Whether the document is still loading/parsing.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Swap in a prepared replacement document and halt further loading.
    pub fn replace_document(&mut self, content: DocumentContent) {
        self.title = content.title;
        self.head_styles = content.styles;
        self.body = content.body;
        self.loading = false;
    }

    // Event surface.

    pub fn add_listener(
        &mut self,
        kind: EventKind,
        capture: bool,
        tag: &'static str,
        handler: EventHandler,
    ) -> u64 {
        self.listeners.add(kind, capture, tag, handler)
    }

    pub fn has_tagged_listener(&self, kind: EventKind, tag: &'static str) -> bool {
        self.listeners.has_tag(kind, tag)
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.count(kind)
    }

    /// Strip all handlers for an event type, as hostile page script would.
    pub fn clear_listeners(&mut self, kind: EventKind) {
        self.listeners.clear(kind);
    }

    /// Dispatch an event through attached listeners and hand it back for
    /// inspection.
    pub fn dispatch(&mut self, mut event: Event) -> Event {
        self.listeners.dispatch(&mut event);
        event
    }

    // Diagnostic globals, surfaced the way page script would call them.

    /// Bind the host engine behind `eval` and the function constructor.
    pub fn bind_code_hosts(&mut self, eval: CodeHook, function_ctor: CodeHook) {
        self.globals.bind_eval_host(eval);
        self.globals.bind_function_host(function_ctor);
    }

    pub fn eval(&mut self, source: &str) -> Result<serde_json::Value> {
        self.globals.eval(source)
    }

    pub fn construct_function(&mut self, source: &str) -> Result<serde_json::Value> {
        self.globals.construct_function(source)
    }

    pub fn attach_shadow(&mut self, host: impl Into<String>) -> Option<ShadowRoot> {
        self.globals.attach_shadow(host)
    }

    pub fn navigator_webdriver(&self) -> Option<bool> {
        self.globals.webdriver()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_document_swaps_everything_and_halts_loading() {
        let mut page = Page::with_body("<main id=\"app\">app</main>");
        page.set_title("App");
        page.insert_style("body { color: red }");
        assert!(page.is_loading());

        page.replace_document(DocumentContent {
            title: "Denied".to_string(),
            styles: vec!["body { margin: 0 }".to_string()],
            body: "<div>denied</div>".to_string(),
        });

        assert_eq!(page.title(), "Denied");
        assert_eq!(page.body(), "<div>denied</div>");
        assert_eq!(page.styles(), ["body { margin: 0 }".to_string()]);
        assert!(!page.is_loading());
    }

    #[test]
    fn test_chrome_delta_never_underflows() {
        let metrics = WindowMetrics {
            inner_width: 1400,
            inner_height: 900,
            outer_width: 1280,
            outer_height: 720,
        };
        assert_eq!(metrics.chrome_delta(), (0, 0));
    }

    #[test]
    fn test_dispatch_returns_event_for_inspection() {
        let mut page = Page::new();
        page.add_listener(
            EventKind::ContextMenu,
            true,
            "guard",
            Box::new(|e| e.prevent_default()),
        );
        let event = page.dispatch(Event::contextmenu());
        assert!(event.default_prevented());
    }
}
