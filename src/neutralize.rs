//! API Neutralizer
//!
//! Overrides the page's diagnostic globals: console sinks become no-ops,
//! `eval` and the callable-code constructor fail with
//! [`Error::SecurityPolicyViolation`](crate::Error::SecurityPolicyViolation)
//! on every call, shadow attachment returns an empty result, and the
//! webdriver flag reads as absent. Irreversible within the page's
//! lifetime: the overrides drop the original capability instead of
//! wrapping it, so no closure holds a path back.
//!
//! Application code still depending on one of these after installation
//! breaks loudly, by design — integrating with the guard has to happen
//! before this point.

use crate::page::{NeutralizedApi, Page};

/// Neutralize all diagnostic globals. Idempotent: re-applying an override
/// to an already-neutralized global changes nothing.
pub fn neutralize(page: &mut Page) {
    let before = page.globals.neutralized().len();

    page.globals.console.silence();
    page.globals.block_eval();
    page.globals.block_function_constructor();
    page.globals.block_shadow_attachment();
    page.globals.hide_webdriver_flag();

    if before < page.globals.neutralized().len() {
        tracing::debug!(
            neutralized = ?page.globals.neutralized(),
            "diagnostic globals neutralized"
        );
    }
}

/// Whether every global the neutralizer covers is currently overridden.
pub fn fully_neutralized(page: &Page) -> bool {
    [
        NeutralizedApi::Console,
        NeutralizedApi::Eval,
        NeutralizedApi::FunctionConstructor,
        NeutralizedApi::AttachShadow,
        NeutralizedApi::WebdriverFlag,
    ]
    .into_iter()
    .all(|api| page.globals.is_neutralized(api))
}
