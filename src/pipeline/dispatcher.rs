//! Middleware that releases computed effects into the message stream.

use crate::core::{mark_as_effect, Message, StateEnvelope};
use crate::store::{DispatchError, Dispatcher, Middleware};

/// Emits one effect carrier per leaf of the pending effect after every
/// reduction.
///
/// For each message it:
///
/// 1. forwards the message down the chain,
/// 2. reads the store's envelope,
/// 3. if the mailbox holds an effect, flattens it and dispatches one effect
///    carrier per leaf, in order, from the top of the chain,
/// 4. returns whatever forwarding returned.
///
/// Each carrier clears the mailbox when it is reduced, so a carrier never
/// re-emits. If forwarding fails, the error propagates and nothing is emitted.
#[derive(Clone, Copy, Debug, Default)]
pub struct EffectDispatcher;

impl EffectDispatcher {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Middleware<StateEnvelope<S>> for EffectDispatcher {
    fn handle(
        &self,
        api: &mut Dispatcher<'_, StateEnvelope<S>>,
        message: Message,
    ) -> Result<Message, DispatchError> {
        let result = api.next(message)?;

        let effects = api.state().effect.flatten();
        if effects.is_empty() {
            return Ok(result);
        }

        tracing::debug!(
            trigger = result.kind(),
            count = effects.len(),
            "emitting effect carriers"
        );
        for effect in &effects {
            api.dispatch(mark_as_effect(effect))?;
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::relay;
    use crate::core::{Effect, ModelError, ModelInput, ModelOutput, Record};

    fn model(input: ModelInput<'_, i64>) -> Result<ModelOutput<i64>, ModelError> {
        let state = input.state.copied().unwrap_or(0);
        Ok(match input.action.kind() {
            "ONE" => ModelOutput::new(state).with_effect(Record::new("A")),
            "NESTED" => ModelOutput::new(state).with_effect(Effect::from(vec![
                Effect::from(Record::new("A")),
                Effect::from(vec![
                    Effect::from(Record::new("B")),
                    Effect::from(vec![Effect::from(Record::new("C"))]),
                ]),
                Effect::from(Record::new("D")),
            ])),
            "HOLLOW" => ModelOutput::new(state).with_effect(Effect::Sequence(vec![])),
            "FAIL" => return Err(ModelError::failed("nope")),
            "TICK" => ModelOutput::new(state + 1),
            "A" | "B" | "C" | "D" => ModelOutput::new(state + 100),
            _ => ModelOutput::new(state),
        })
    }

    fn carriers(store: &crate::store::Store<StateEnvelope<i64>>) -> Vec<String> {
        store
            .history()
            .messages()
            .into_iter()
            .filter(|m| m.is_effect_carrier())
            .map(|m| m.kind().to_string())
            .collect()
    }

    #[test]
    fn single_effect_emits_one_carrier() {
        let mut store = relay(model).history_capacity(16).build().unwrap();

        store.dispatch(Record::new("ONE")).unwrap();

        assert_eq!(carriers(&store), vec!["A"]);
        assert!(!store.state().has_effect());
    }

    #[test]
    fn nested_effects_emit_in_flattened_order() {
        let mut store = relay(model).history_capacity(16).build().unwrap();

        store.dispatch(Record::new("NESTED")).unwrap();

        assert_eq!(carriers(&store), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn no_effect_means_no_extra_dispatch() {
        let mut store = relay(model).history_capacity(16).build().unwrap();

        store.dispatch(Record::new("TICK")).unwrap();
        store.dispatch(Record::new("HOLLOW")).unwrap();

        assert_eq!(store.history().entries().len(), 2);
        assert_eq!(store.state().state, Some(1));
    }

    #[test]
    fn carriers_do_not_reach_the_model() {
        let mut store = relay(model).build().unwrap();

        store.dispatch(Record::new("NESTED")).unwrap();

        // A carrier reaching the model would add 100.
        assert_eq!(store.state().state, Some(0));
    }

    #[test]
    fn returns_the_forwarded_message() {
        let mut store = relay(model).build().unwrap();

        let returned = store.dispatch(Record::new("ONE")).unwrap();
        assert_eq!(returned, Message::action(Record::new("ONE")));
    }

    #[test]
    fn model_errors_propagate_without_emission() {
        let mut store = relay(model).history_capacity(16).build().unwrap();
        store.dispatch(Record::new("ONE")).unwrap();
        let before = store.history().entries().len();

        let err = store.dispatch(Record::new("FAIL")).unwrap_err();

        assert!(matches!(err, DispatchError::Model(_)));
        assert_eq!(store.history().entries().len(), before);
    }
}
