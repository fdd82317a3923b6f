//! Reducer adapter: wraps a [`Model`] into an envelope reducer.

use super::effect::{Effect, MAX_EFFECT_DEPTH};
use super::envelope::StateEnvelope;
use super::message::Message;
use super::model::{Model, ModelError, ModelInput};
use std::marker::PhantomData;

/// Reducer over [`StateEnvelope`]s built from a model.
///
/// - An effect carrier leaves the state untouched and clears the mailbox. The
///   model is not invoked.
/// - Any other message is handed to the model and its effect replaces the
///   mailbox contents. Effects nested deeper than [`MAX_EFFECT_DEPTH`] are
///   rejected as malformed output.
///
/// # Example
///
/// ```rust
/// use effect_relay::core::{
///     make_reducer, mark_as_effect, Message, ModelError, ModelInput, ModelOutput, Record,
/// };
///
/// fn model(input: ModelInput<'_, i64>) -> Result<ModelOutput<i64>, ModelError> {
///     let state = input.state.copied().unwrap_or(0);
///     Ok(ModelOutput::new(state + 1).with_effect(Record::new("SAVE")))
/// }
///
/// let reducer = make_reducer(model);
///
/// let after_action = reducer.reduce(None, &Message::action(Record::new("BUMP"))).unwrap();
/// assert_eq!(after_action.state, Some(1));
/// assert!(after_action.has_effect());
///
/// let after_carrier = reducer
///     .reduce(Some(&after_action), &mark_as_effect(&Record::new("SAVE")))
///     .unwrap();
/// assert_eq!(after_carrier.state, Some(1));
/// assert!(!after_carrier.has_effect());
/// ```
pub struct Reducer<S, M> {
    model: M,
    _state: PhantomData<fn() -> S>,
}

impl<S, M> Reducer<S, M>
where
    S: Clone,
    M: Model<S>,
{
    pub fn new(model: M) -> Self {
        Self {
            model,
            _state: PhantomData,
        }
    }

    /// Compute the next envelope. `envelope` is `None` on store initialization.
    ///
    /// Model errors propagate unchanged; nothing is written on failure because
    /// the previous envelope is only borrowed.
    pub fn reduce(
        &self,
        envelope: Option<&StateEnvelope<S>>,
        message: &Message,
    ) -> Result<StateEnvelope<S>, ModelError> {
        let state = envelope.and_then(|e| e.state.as_ref());

        let action = match message {
            Message::Effect(record) => {
                tracing::trace!(effect = record.kind(), "effect carrier bypasses the model");
                return Ok(StateEnvelope {
                    state: state.cloned(),
                    effect: Effect::Empty,
                });
            }
            Message::Action(record) => record,
        };

        let output = self.model.step(ModelInput { state, action })?;
        let depth = output.result.effect.depth();
        if depth > MAX_EFFECT_DEPTH {
            tracing::warn!(action = action.kind(), depth, "effect nesting too deep");
            return Err(ModelError::MalformedOutput(format!(
                "effect nested {depth} levels deep, limit is {MAX_EFFECT_DEPTH}"
            )));
        }
        tracing::trace!(
            action = action.kind(),
            has_effect = !output.result.effect.is_empty(),
            "model step applied"
        );

        Ok(StateEnvelope {
            state: Some(output.state),
            effect: output.result.effect,
        })
    }

    /// The wrapped model.
    pub fn model(&self) -> &M {
        &self.model
    }
}

/// Wrap `model` into an envelope reducer.
pub fn make_reducer<S, M>(model: M) -> Reducer<S, M>
where
    S: Clone,
    M: Model<S>,
{
    Reducer::new(model)
}
