//! Build errors for the store builder.

use crate::store::DispatchError;
use thiserror::Error;

/// Errors that can occur when building a store.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Reducer not specified. Call .reducer(reducer) before .build()")]
    MissingReducer,

    #[error("max_dispatch_depth must be at least 1")]
    ZeroDispatchDepth,

    #[error("Store initialization failed: {0}")]
    Init(#[source] DispatchError),
}
