//! Property-based tests for the effect lifecycle.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated messages and effect trees.

use effect_relay::core::{
    make_reducer, mark_as_effect, Effect, Message, ModelError, ModelInput, ModelOutput, Record,
    StateEnvelope,
};
use effect_relay::relay;
use proptest::prelude::*;
use serde_json::Value;

fn model(input: ModelInput<'_, i64>) -> Result<ModelOutput<i64>, ModelError> {
    let state = input.state.copied().unwrap_or(0);
    let action = input.action;
    let n = action.field("n").and_then(Value::as_i64).unwrap_or(0);
    Ok(match action.kind() {
        "ADD" => ModelOutput::new(state + n),
        "EMIT" => ModelOutput::new(state)
            .with_effect(vec![Record::new("PING"); n.max(0) as usize]),
        _ => ModelOutput::new(state),
    })
}

fn pure_model(input: ModelInput<'_, i64>) -> Result<ModelOutput<i64>, ModelError> {
    let state = input.state.copied().unwrap_or(0);
    let n = input.action.field("n").and_then(Value::as_i64).unwrap_or(0);
    Ok(ModelOutput::new(state.wrapping_mul(3).wrapping_add(n)))
}

fn collect_leaves(effect: &Effect, out: &mut Vec<Record>) {
    match effect {
        Effect::Empty => {}
        Effect::Leaf(record) => out.push(record.clone()),
        Effect::Sequence(items) => items.iter().for_each(|item| collect_leaves(item, out)),
    }
}

prop_compose! {
    fn arbitrary_record()(kind in "[A-E]", n in 1..100i64) -> Record {
        Record::new(kind).with("n", n)
    }
}

prop_compose! {
    fn arbitrary_carrier()(kind in prop::sample::select(vec!["ADD", "EMIT", "PING"]), n in 1..50i64) -> Message {
        mark_as_effect(&Record::new(kind).with("n", n))
    }
}

prop_compose! {
    fn arbitrary_action()(emit in any::<bool>(), n in 0..6i64) -> Record {
        Record::new(if emit { "EMIT" } else { "ADD" }).with("n", n)
    }
}

fn arbitrary_effect() -> impl Strategy<Value = Effect> {
    let leaf = prop_oneof![
        1 => Just(Effect::Empty),
        4 => arbitrary_record().prop_map(Effect::Leaf),
    ];
    leaf.prop_recursive(5, 64, 6, |inner| {
        prop::collection::vec(inner, 0..6).prop_map(Effect::Sequence)
    })
}

proptest! {
    #[test]
    fn carrier_reduction_is_a_noop_that_clears_the_mailbox(
        state in prop::option::of(any::<i64>()),
        effect in arbitrary_effect(),
        carrier in arbitrary_carrier(),
    ) {
        let reducer = make_reducer(model);
        let envelope = StateEnvelope { state, effect };

        let next = reducer.reduce(Some(&envelope), &carrier).unwrap();

        prop_assert_eq!(next, StateEnvelope { state, effect: Effect::Empty });
    }

    #[test]
    fn mailbox_is_empty_after_every_dispatch(actions in prop::collection::vec(arbitrary_action(), 1..20)) {
        let mut store = relay(model).build().unwrap();

        for action in actions {
            store.dispatch(action).unwrap();
            prop_assert!(!store.state().has_effect());
        }
    }

    #[test]
    fn flatten_preserves_depth_first_order(effect in arbitrary_effect()) {
        let mut expected = Vec::new();
        collect_leaves(&effect, &mut expected);

        prop_assert_eq!(effect.flatten(), expected.clone());
        prop_assert_eq!(effect.is_empty(), expected.is_empty());
    }

    #[test]
    fn flatten_keeps_explicit_nesting_order(
        a in arbitrary_record(),
        b in arbitrary_record(),
        c in arbitrary_record(),
        d in arbitrary_record(),
        e in arbitrary_record(),
    ) {
        let effect = Effect::from(vec![
            Effect::from(a.clone()),
            Effect::from(vec![
                Effect::from(b.clone()),
                Effect::from(c.clone()),
                Effect::from(vec![Effect::from(d.clone())]),
            ]),
            Effect::from(e.clone()),
        ]);

        prop_assert_eq!(effect.flatten(), vec![a, b, c, d, e]);
    }

    #[test]
    fn each_emitted_effect_is_dispatched_exactly_once(n in 0..10i64) {
        let mut store = relay(model).history_capacity(64).build().unwrap();

        store.dispatch(Record::new("EMIT").with("n", n)).unwrap();

        prop_assert_eq!(store.history().effect_count("PING"), n as usize);
        prop_assert_eq!(store.history().entries().len(), 1 + n as usize);
    }

    #[test]
    fn effect_free_model_matches_direct_fold(ns in prop::collection::vec(-1000..1000i64, 0..30)) {
        let mut store = relay(pure_model).history_capacity(64).build().unwrap();
        let initial = store.state().state.unwrap();

        for n in &ns {
            store.dispatch(Record::new("STEP").with("n", *n)).unwrap();
        }

        let expected = ns
            .iter()
            .fold(initial, |state, n| state.wrapping_mul(3).wrapping_add(*n));
        prop_assert_eq!(store.state().state, Some(expected));
        prop_assert_eq!(store.history().entries().len(), ns.len());
    }
}
