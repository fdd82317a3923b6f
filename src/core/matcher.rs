//! Message predicates used by execution pipelines to select what they handle.
//!
//! Matchers are pure boolean functions over [`Message`]. They let a pipeline
//! subscribe to specific effect kinds without knowing how effect carriers are
//! represented.

use super::message::Message;
use std::fmt;
use std::sync::Arc;

/// Pure predicate over messages.
///
/// # Example
///
/// ```rust
/// use effect_relay::core::{mark_as_effect, match_effect, Message, Record};
///
/// let on_fetch = match_effect("FETCH");
///
/// assert!(on_fetch.check(&mark_as_effect(&Record::new("FETCH"))));
/// assert!(!on_fetch.check(&Message::action(Record::new("FETCH"))));
/// assert!(!on_fetch.check(&mark_as_effect(&Record::new("SAVE"))));
/// ```
#[derive(Clone)]
pub struct Matcher {
    predicate: Arc<dyn Fn(&Message) -> bool + Send + Sync>,
}

impl Matcher {
    /// Create a matcher from a pure predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Message) -> bool + Send + Sync + 'static,
    {
        Matcher {
            predicate: Arc::new(predicate),
        }
    }

    /// Matches effect carriers whose record has the given `type`.
    pub fn effect(kind: impl Into<String>) -> Self {
        let kind = kind.into();
        Self::new(move |message| message.is_effect_carrier() && message.kind() == kind)
    }

    /// Matches ordinary actions whose record has the given `type`.
    pub fn action(kind: impl Into<String>) -> Self {
        let kind = kind.into();
        Self::new(move |message| !message.is_effect_carrier() && message.kind() == kind)
    }

    /// Matches every effect carrier.
    pub fn any_effect() -> Self {
        Self::new(Message::is_effect_carrier)
    }

    /// Evaluate the predicate.
    pub fn check(&self, message: &Message) -> bool {
        (self.predicate)(message)
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher").finish_non_exhaustive()
    }
}

/// Predicate true iff the message is an effect carrier of type `kind`.
pub fn match_effect(kind: impl Into<String>) -> Matcher {
    Matcher::effect(kind)
}
