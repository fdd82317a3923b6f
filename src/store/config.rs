//! Store configuration.

use serde::{Deserialize, Serialize};

/// Default limit on nested dispatches.
pub const DEFAULT_MAX_DISPATCH_DEPTH: usize = 64;

/// Tunables for a [`Store`](super::Store).
///
/// Missing keys take their defaults, so a partial JSON document is a valid
/// configuration.
///
/// # Example
///
/// ```rust
/// use effect_relay::store::StoreConfig;
///
/// let config: StoreConfig = serde_json::from_str(r#"{"history_capacity": 32}"#).unwrap();
///
/// assert_eq!(config.history_capacity, 32);
/// assert_eq!(config.max_dispatch_depth, 64);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum nesting of dispatches started from inside middleware
    pub max_dispatch_depth: usize,

    /// Number of reduced messages kept in the dispatch log; 0 disables it
    pub history_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_dispatch_depth: DEFAULT_MAX_DISPATCH_DEPTH,
            history_capacity: 0,
        }
    }
}
