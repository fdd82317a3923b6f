//! Dispatch error types.

use crate::core::ModelError;
use thiserror::Error;

/// Errors that can abort a dispatch.
///
/// Nothing in this crate retries or recovers: every error propagates to the
/// caller of [`Store::dispatch`](super::Store::dispatch).
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The model raised an error or produced malformed output
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Nested dispatches went deeper than the configured limit
    #[error("Dispatch depth limit ({limit}) exceeded while dispatching '{kind}'")]
    DepthExceeded { limit: usize, kind: String },

    /// An effect handler in an execution pipeline failed
    #[error("Handler for effect '{effect}' failed: {source}")]
    Handler {
        effect: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A `DISPATCH` effect carried no usable `action`
    #[error("Malformed DISPATCH effect: {0}")]
    MalformedDispatch(String),
}

impl DispatchError {
    /// Wrap an error raised while handling `effect`.
    pub fn handler(
        effect: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Handler {
            effect: effect.into(),
            source: source.into(),
        }
    }
}
