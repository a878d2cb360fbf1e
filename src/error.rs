//! Error types for vigil

use thiserror::Error;

/// Result type for vigil operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for vigil
#[derive(Debug, Error)]
pub enum Error {
    /// A neutralized entry point was invoked. This is the engineered
    /// failure: after `neutralize()`, dynamic evaluation and callable-code
    /// construction always fail with this kind, loudly, to the caller.
    #[error("security policy violation: {api} is disabled on this page")]
    SecurityPolicyViolation { api: &'static str },

    /// The embedding host's hook failed or is not bound
    #[error("host error in {context}: {message}")]
    Host { context: String, message: String },

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a policy violation for a named entry point
    pub fn policy(api: &'static str) -> Self {
        Self::SecurityPolicyViolation { api }
    }

    /// Create a host error with context
    pub fn host(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Host {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Check if this is the engineered post-neutralization failure
    pub fn is_policy_violation(&self) -> bool {
        matches!(self, Error::SecurityPolicyViolation { .. })
    }
}
