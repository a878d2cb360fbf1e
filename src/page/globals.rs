//! Diagnostic globals table
//!
//! The globals a page normally reaches for when someone inspects it:
//! console sinks, dynamic code evaluation, the callable-code constructor,
//! shadow-root attachment, and the automation (webdriver) flag. Instead of
//! monkeying ambient state, the table is owned by the [`Page`](super::Page)
//! so the neutralized set is explicit and enumerable, and neutralization
//! drops the original capability rather than hiding it behind a closure.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Console method families covered by the logging sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsoleLevel {
    Log,
    Warn,
    Error,
    Info,
    Debug,
    Group,
    GroupEnd,
    Time,
    TimeEnd,
    Trace,
}

impl ConsoleLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsoleLevel::Log => "log",
            ConsoleLevel::Warn => "warn",
            ConsoleLevel::Error => "error",
            ConsoleLevel::Info => "info",
            ConsoleLevel::Debug => "debug",
            ConsoleLevel::Group => "group",
            ConsoleLevel::GroupEnd => "groupEnd",
            ConsoleLevel::Time => "time",
            ConsoleLevel::TimeEnd => "timeEnd",
            ConsoleLevel::Trace => "trace",
        }
    }
}

enum ConsoleSink {
    Native,
    Silenced,
}

/// The page's logging sink.
///
/// Native mode captures entries (and forwards them to `tracing`); silenced
/// mode drops everything. Silencing also clears anything already captured,
/// matching a `clear()`-then-no-op sequence.
pub struct Console {
    sink: ConsoleSink,
    captured: Vec<(ConsoleLevel, String)>,
}

impl Default for Console {
    fn default() -> Self {
        Self {
            sink: ConsoleSink::Native,
            captured: Vec::new(),
        }
    }
}

impl Console {
    /// Write an entry through the sink.
    pub fn write(&mut self, level: ConsoleLevel, message: impl Into<String>) {
        match self.sink {
            ConsoleSink::Native => {
                let message = message.into();
                tracing::debug!(level = level.as_str(), message = %message, "console");
                self.captured.push((level, message));
            }
            ConsoleSink::Silenced => {}
        }
    }

    /// Switch every console method to a no-op and discard captured output.
    pub fn silence(&mut self) {
        self.sink = ConsoleSink::Silenced;
        self.captured.clear();
    }

    pub fn is_silenced(&self) -> bool {
        matches!(self.sink, ConsoleSink::Silenced)
    }

    /// Entries captured while the sink was native.
    pub fn captured(&self) -> &[(ConsoleLevel, String)] {
        &self.captured
    }
}

/// Host hook for code-executing entry points.
pub type CodeHook = Box<dyn FnMut(&str) -> Result<serde_json::Value> + Send>;

enum CodeSlot {
    /// No host engine bound yet.
    Unbound,
    /// Delegates to the embedding host's engine.
    Host(CodeHook),
    /// Neutralized; always fails.
    Blocked,
}

impl CodeSlot {
    fn invoke(&mut self, api: &'static str, source: &str) -> Result<serde_json::Value> {
        match self {
            CodeSlot::Unbound => Err(Error::host(api, "no host hook bound")),
            CodeSlot::Host(hook) => hook(source),
            CodeSlot::Blocked => Err(Error::policy(api)),
        }
    }
}

/// A live shadow root handle, as returned by native shadow attachment.
#[derive(Debug, Clone)]
pub struct ShadowRoot {
    pub host: String,
}

enum ShadowSlot {
    Native,
    Blocked,
}

/// Globals the neutralizer has overridden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeutralizedApi {
    Console,
    Eval,
    FunctionConstructor,
    AttachShadow,
    WebdriverFlag,
}

/// Read-only descriptor published on the page once the guard is installed.
/// Informational only; nothing calls through it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardMarker {
    pub version: String,
    pub protected: bool,
    pub note: String,
}

impl GuardMarker {
    /// Marker for the running crate version.
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            protected: true,
            note: "source inspection is disabled on this page".to_string(),
        }
    }
}

/// The page's diagnostic globals.
pub struct Globals {
    pub console: Console,
    eval: CodeSlot,
    function_ctor: CodeSlot,
    shadow: ShadowSlot,
    webdriver: Option<bool>,
    marker: Option<GuardMarker>,
}

impl Default for Globals {
    fn default() -> Self {
        Self {
            console: Console::default(),
            eval: CodeSlot::Unbound,
            function_ctor: CodeSlot::Unbound,
            shadow: ShadowSlot::Native,
            webdriver: Some(false),
            marker: None,
        }
    }
}

impl Globals {
    /// Bind the host engine behind `eval`.
    pub fn bind_eval_host(&mut self, hook: CodeHook) {
        if !matches!(self.eval, CodeSlot::Blocked) {
            self.eval = CodeSlot::Host(hook);
        }
    }

    /// Bind the host engine behind the callable-code constructor.
    pub fn bind_function_host(&mut self, hook: CodeHook) {
        if !matches!(self.function_ctor, CodeSlot::Blocked) {
            self.function_ctor = CodeSlot::Host(hook);
        }
    }

    /// Dynamic code evaluation entry point.
    pub fn eval(&mut self, source: &str) -> Result<serde_json::Value> {
        self.eval.invoke("eval", source)
    }

    /// Callable-code construction entry point.
    pub fn construct_function(&mut self, source: &str) -> Result<serde_json::Value> {
        self.function_ctor.invoke("Function", source)
    }

    /// Shadow-root attachment. Returns `None` once neutralized.
    pub fn attach_shadow(&mut self, host: impl Into<String>) -> Option<ShadowRoot> {
        match self.shadow {
            ShadowSlot::Native => Some(ShadowRoot { host: host.into() }),
            ShadowSlot::Blocked => None,
        }
    }

    /// The automation-detection flag. `None` means absent.
    pub fn webdriver(&self) -> Option<bool> {
        self.webdriver
    }

    pub fn block_eval(&mut self) {
        self.eval = CodeSlot::Blocked;
    }

    pub fn block_function_constructor(&mut self) {
        self.function_ctor = CodeSlot::Blocked;
    }

    pub fn block_shadow_attachment(&mut self) {
        self.shadow = ShadowSlot::Blocked;
    }

    pub fn hide_webdriver_flag(&mut self) {
        self.webdriver = None;
    }

    /// Publish the guard marker. First write wins; the descriptor stays
    /// read-only afterwards.
    pub fn publish_marker(&mut self, marker: GuardMarker) {
        if self.marker.is_none() {
            self.marker = Some(marker);
        }
    }

    pub fn marker(&self) -> Option<&GuardMarker> {
        self.marker.as_ref()
    }

    pub fn is_neutralized(&self, api: NeutralizedApi) -> bool {
        match api {
            NeutralizedApi::Console => self.console.is_silenced(),
            NeutralizedApi::Eval => matches!(self.eval, CodeSlot::Blocked),
            NeutralizedApi::FunctionConstructor => {
                matches!(self.function_ctor, CodeSlot::Blocked)
            }
            NeutralizedApi::AttachShadow => matches!(self.shadow, ShadowSlot::Blocked),
            NeutralizedApi::WebdriverFlag => self.webdriver.is_none(),
        }
    }

    /// The currently neutralized set.
    pub fn neutralized(&self) -> Vec<NeutralizedApi> {
        [
            NeutralizedApi::Console,
            NeutralizedApi::Eval,
            NeutralizedApi::FunctionConstructor,
            NeutralizedApi::AttachShadow,
            NeutralizedApi::WebdriverFlag,
        ]
        .into_iter()
        .filter(|api| self.is_neutralized(*api))
        .collect()
    }
}
