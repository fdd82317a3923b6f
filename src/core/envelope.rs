//! The value held by the store: model state plus the effect mailbox.

use super::effect::Effect;
use serde::{Deserialize, Serialize};

/// Model state paired with the effect produced by the last model step.
///
/// `effect` is a one-shot mailbox between the reducer and the effect
/// dispatcher. The reducer sets it on every model step and clears it whenever
/// an effect carrier passes through. It is not durable state.
///
/// Envelopes are replaced on every message, never mutated in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "S: Serialize", deserialize = "S: Deserialize<'de>"))]
pub struct StateEnvelope<S> {
    /// Domain state threaded through the model; `None` before the first step.
    pub state: Option<S>,
    /// Pending effect, `Effect::Empty` when there is none.
    #[serde(default)]
    pub effect: Effect,
}

impl<S> StateEnvelope<S> {
    /// Envelope with the given state and no pending effect.
    pub fn new(state: S) -> Self {
        Self {
            state: Some(state),
            effect: Effect::Empty,
        }
    }

    /// True when the mailbox holds an effect that would emit at least one carrier.
    pub fn has_effect(&self) -> bool {
        !self.effect.is_empty()
    }
}

impl<S> Default for StateEnvelope<S> {
    fn default() -> Self {
        Self {
            state: None,
            effect: Effect::Empty,
        }
    }
}
