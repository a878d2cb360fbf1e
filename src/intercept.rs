//! Input Interceptor
//!
//! Capturing-phase handlers that swallow the gestures commonly used to
//! inspect a page: function keys, inspect/view-source/save chords,
//! alt-accelerators, right-click menus, source-retrieval messages from
//! other documents, and easy navigation away. Attachment is keyed on an
//! owner tag, so `arm` is idempotent under the enforcement tick: handlers
//! stripped by the page are re-attached, present ones are left alone.

use crate::page::{Event, EventData, EventKind, Page};

/// Owner tag for every listener the guard attaches.
pub(crate) const GUARD_TAG: &str = "vigil";

/// Page-wide rule disabling text selection, long-press callouts, and
/// pointer interaction on images.
pub const SELECTION_LOCK_STYLE: &str = "\
* { user-select: none !important; -webkit-user-select: none !important; }\n\
body { -webkit-touch-callout: none !important; }\n\
img { pointer-events: none !important; }";

/// Letters cancelled together with ctrl/command: view-source, save,
/// inspect-element, console, copy.
const BLOCKED_PRIMARY_CHORD_KEYS: [char; 5] = ['u', 's', 'i', 'j', 'c'];

const UNLOAD_PROMPT: &str = "Leave this page?";

/// Attach all interceptors and the selection-lock style rule. Safe to
/// invoke repeatedly; the handler count per event type stays constant.
pub fn arm(page: &mut Page) {
    attach(page, EventKind::KeyDown, on_keydown);
    attach(page, EventKind::ContextMenu, on_contextmenu);
    attach(page, EventKind::Message, on_message);
    attach(page, EventKind::BeforeUnload, on_beforeunload);

    // Checked insertion keeps the head style list stable across re-arms.
    if !page.has_style(SELECTION_LOCK_STYLE) {
        page.insert_style(SELECTION_LOCK_STYLE);
    }
}

fn attach(page: &mut Page, kind: EventKind, handler: fn(&mut Event)) {
    if page.has_tagged_listener(kind, GUARD_TAG) {
        return;
    }
    tracing::debug!(event = kind.as_str(), "attaching interceptor");
    page.add_listener(kind, true, GUARD_TAG, Box::new(handler));
}

/// F1–F24.
fn is_function_key(key: &str) -> bool {
    let Some(digits) = key.strip_prefix('F') else {
        return false;
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    matches!(digits.parse::<u8>(), Ok(1..=24))
}

fn cancel(event: &mut Event) {
    event.prevent_default();
    event.stop_propagation();
}

fn on_keydown(event: &mut Event) {
    let EventData::Key(key) = &event.data else {
        return;
    };

    if is_function_key(&key.key) {
        cancel(event);
        return;
    }

    if key.modifiers.primary() {
        let blocked = key
            .key
            .chars()
            .next()
            .map(|c| BLOCKED_PRIMARY_CHORD_KEYS.contains(&c.to_ascii_lowercase()))
            .unwrap_or(false);
        if blocked && key.key.chars().count() == 1 {
            cancel(event);
            return;
        }
    }

    // Coarse: alt chords cover menu accelerators wholesale.
    if key.modifiers.alt {
        cancel(event);
    }
}

fn on_contextmenu(event: &mut Event) {
    cancel(event);
}

fn on_message(event: &mut Event) {
    let EventData::Message(payload) = &event.data else {
        return;
    };
    let is_source_request = payload
        .get("type")
        .and_then(|t| t.as_str())
        .map(|t| t == "getSource")
        .unwrap_or(false);
    if is_source_request {
        // No reply; later listeners never see the request.
        event.stop_immediate_propagation();
    }
}

fn on_beforeunload(event: &mut Event) {
    event.prevent_default();
    event.request_unload_prompt(UNLOAD_PROMPT);
}
