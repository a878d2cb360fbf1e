//! Host event model
//!
//! A trimmed-down DOM event surface covering exactly the events the guard
//! owns: keyboard input, context menus, unload confirmation, cross-document
//! messages, and the page load event. Listeners attach in the capturing
//! phase and can cancel the default action or stop propagation, the same
//! contract the W3C event model gives page script.

use std::collections::HashMap;

use smallvec::SmallVec;

/// Events the guard attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    KeyDown,
    ContextMenu,
    BeforeUnload,
    Message,
    Load,
}

impl EventKind {
    /// Event type name as page script would see it.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::KeyDown => "keydown",
            EventKind::ContextMenu => "contextmenu",
            EventKind::BeforeUnload => "beforeunload",
            EventKind::Message => "message",
            EventKind::Load => "load",
        }
    }

    /// Whether the default action can be prevented.
    pub fn cancelable(&self) -> bool {
        !matches!(self, EventKind::Load)
    }
}

/// Modifier keys held during a keyboard event.
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Control or command, the cross-platform "primary" modifier.
    pub fn primary(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Keyboard event payload.
#[derive(Debug, Clone, Default)]
pub struct KeyData {
    /// Key value (e.g. "u", "F12", "Escape").
    pub key: String,
    pub modifiers: Modifiers,
}

/// Event-specific payload.
#[derive(Debug, Clone)]
pub enum EventData {
    None,
    Key(KeyData),
    /// Cross-document message body.
    Message(serde_json::Value),
}

/// A single dispatched event.
#[derive(Debug)]
pub struct Event {
    pub kind: EventKind,
    pub data: EventData,
    pub cancelable: bool,
    default_prevented: bool,
    prevent_default_calls: u32,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
    unload_prompt: Option<String>,
}

impl Event {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            data: EventData::None,
            cancelable: kind.cancelable(),
            default_prevented: false,
            prevent_default_calls: 0,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
            unload_prompt: None,
        }
    }

    /// Build a keydown event.
    pub fn keydown(key: impl Into<String>, modifiers: Modifiers) -> Self {
        let mut event = Self::new(EventKind::KeyDown);
        event.data = EventData::Key(KeyData {
            key: key.into(),
            modifiers,
        });
        event
    }

    /// Build a contextmenu (right-click) event.
    pub fn contextmenu() -> Self {
        Self::new(EventKind::ContextMenu)
    }

    /// Build a beforeunload event.
    pub fn beforeunload() -> Self {
        Self::new(EventKind::BeforeUnload)
    }

    /// Build a cross-document message event.
    pub fn message(payload: serde_json::Value) -> Self {
        let mut event = Self::new(EventKind::Message);
        event.data = EventData::Message(payload);
        event
    }

    /// Prevent the default action. No-op for non-cancelable events.
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
            self.prevent_default_calls += 1;
        }
    }

    /// Stop propagation to listeners on later targets.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop propagation including remaining listeners on this target.
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    /// Request a browser confirmation prompt before unload.
    pub fn request_unload_prompt(&mut self, prompt: impl Into<String>) {
        self.unload_prompt = Some(prompt.into());
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// How many times `prevent_default` was honored. Exactly one guard
    /// handler should fire per gesture; duplicates indicate re-arm leaked
    /// extra registrations.
    pub fn prevent_default_calls(&self) -> u32 {
        self.prevent_default_calls
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn unload_prompt(&self) -> Option<&str> {
        self.unload_prompt.as_deref()
    }
}

/// Event handler callback type.
pub type EventHandler = Box<dyn FnMut(&mut Event) + Send>;

struct Listener {
    handler: EventHandler,
    capture: bool,
    tag: &'static str,
    id: u64,
}

/// Listener registry for the page document.
///
/// Entries carry an owner tag so idempotent re-attachment can be keyed on
/// "is my handler still installed" rather than attaching blindly.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: HashMap<EventKind, SmallVec<[Listener; 4]>>,
    next_id: u64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a handler; returns its registration id.
    pub fn add(
        &mut self,
        kind: EventKind,
        capture: bool,
        tag: &'static str,
        handler: EventHandler,
    ) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.listeners.entry(kind).or_default().push(Listener {
            handler,
            capture,
            tag,
            id,
        });
        id
    }

    /// Whether any handler with the given owner tag is attached for `kind`.
    pub fn has_tag(&self, kind: EventKind, tag: &'static str) -> bool {
        self.listeners
            .get(&kind)
            .map(|entries| entries.iter().any(|l| l.tag == tag))
            .unwrap_or(false)
    }

    /// Number of handlers attached for `kind`.
    pub fn count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map(|l| l.len()).unwrap_or(0)
    }

    /// Remove a handler by id.
    pub fn remove(&mut self, kind: EventKind, id: u64) -> bool {
        if let Some(entries) = self.listeners.get_mut(&kind) {
            if let Some(pos) = entries.iter().position(|l| l.id == id) {
                entries.remove(pos);
                return true;
            }
        }
        false
    }

    /// Strip every handler for `kind`, whoever attached it. This is the
    /// hostile-page action the enforcement tick defends against.
    pub fn clear(&mut self, kind: EventKind) {
        self.listeners.remove(&kind);
    }

    /// Dispatch an event through capture-phase handlers, then the rest.
    /// Stopping propagation in the capture phase keeps the event from
    /// reaching any bubble-phase listener.
    pub fn dispatch(&mut self, event: &mut Event) {
        for capture in [true, false] {
            if event.immediate_propagation_stopped {
                break;
            }
            if !capture && event.propagation_stopped {
                break;
            }
            if let Some(entries) = self.listeners.get_mut(&event.kind) {
                for listener in entries.iter_mut() {
                    if listener.capture != capture {
                        continue;
                    }
                    (listener.handler)(event);
                    if event.immediate_propagation_stopped {
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_handlers_run_before_bubble_handlers() {
        let mut registry = ListenerRegistry::new();
        let order = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));

        let o = order.clone();
        registry.add(
            EventKind::ContextMenu,
            false,
            "page",
            Box::new(move |_| o.lock().unwrap().push("bubble")),
        );
        let o = order.clone();
        registry.add(
            EventKind::ContextMenu,
            true,
            "guard",
            Box::new(move |_| o.lock().unwrap().push("capture")),
        );

        let mut event = Event::contextmenu();
        registry.dispatch(&mut event);
        assert_eq!(*order.lock().unwrap(), vec!["capture", "bubble"]);
    }

    #[test]
    fn test_stop_immediate_propagation_halts_later_listeners() {
        let mut registry = ListenerRegistry::new();
        registry.add(
            EventKind::Message,
            true,
            "guard",
            Box::new(|e| e.stop_immediate_propagation()),
        );
        let reached = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let r = reached.clone();
        registry.add(
            EventKind::Message,
            false,
            "page",
            Box::new(move |_| r.store(true, std::sync::atomic::Ordering::SeqCst)),
        );

        let mut event = Event::message(serde_json::json!({"type": "getSource"}));
        registry.dispatch(&mut event);
        assert!(event.propagation_stopped());
        assert!(!reached.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[test]
    fn test_prevent_default_ignored_for_non_cancelable() {
        let mut event = Event::new(EventKind::Load);
        event.prevent_default();
        assert!(!event.default_prevented());
        assert_eq!(event.prevent_default_calls(), 0);
    }

    #[test]
    fn test_tagged_lookup_and_clear() {
        let mut registry = ListenerRegistry::new();
        registry.add(EventKind::KeyDown, true, "guard", Box::new(|_| {}));
        assert!(registry.has_tag(EventKind::KeyDown, "guard"));
        assert!(!registry.has_tag(EventKind::KeyDown, "page"));

        registry.clear(EventKind::KeyDown);
        assert!(!registry.has_tag(EventKind::KeyDown, "guard"));
        assert_eq!(registry.count(EventKind::KeyDown), 0);
    }
}
