//! End-to-end tests: a counter model wired to a store and an execution
//! pipeline.

use effect_relay::core::{
    Effect, JsonModel, ModelError, ModelInput, ModelOutput, Record, StateEnvelope,
};
use effect_relay::store::{DispatchError, Dispatcher};
use effect_relay::{relay, EffectRunner, Message};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::rc::Rc;

type Envelope = StateEnvelope<i64>;

fn increment_once(input: ModelInput<'_, i64>) -> Result<ModelOutput<i64>, ModelError> {
    let count = input.state.copied().unwrap_or(0);
    Ok(match input.action.kind() {
        "INCREMENT" => ModelOutput::new(count).with_effect(Record::new("INCREMENT")),
        "ACTUALLY_INCREMENT" => ModelOutput::new(count + 1),
        _ => ModelOutput::new(count),
    })
}

fn increment_nested(input: ModelInput<'_, i64>) -> Result<ModelOutput<i64>, ModelError> {
    let count = input.state.copied().unwrap_or(0);
    let inc = || Effect::from(Record::new("INCREMENT"));
    Ok(match input.action.kind() {
        "INCREMENT" => ModelOutput::new(count).with_effect(vec![
            inc(),
            Effect::from(vec![inc(), inc(), Effect::from(vec![inc()])]),
        ]),
        "ACTUALLY_INCREMENT" => ModelOutput::new(count + 1),
        _ => ModelOutput::new(count),
    })
}

fn increment_via_dispatch(input: ModelInput<'_, i64>) -> Result<ModelOutput<i64>, ModelError> {
    let count = input.state.copied().unwrap_or(0);
    Ok(match input.action.kind() {
        "INCREMENT" => ModelOutput::new(count)
            .with_effect(Effect::dispatch(Record::new("ACTUALLY_INCREMENT"))),
        "ACTUALLY_INCREMENT" => ModelOutput::new(count + 1),
        _ => ModelOutput::new(count),
    })
}

fn actually_increment(
    _effect: &Record,
    api: &mut Dispatcher<'_, Envelope>,
) -> Result<(), DispatchError> {
    api.dispatch_action(Record::new("ACTUALLY_INCREMENT"))?;
    Ok(())
}

fn counter_runner() -> EffectRunner<Envelope> {
    EffectRunner::new().on_effect("INCREMENT", actually_increment)
}

#[test]
fn store_starts_with_initial_model_state_and_no_effect() {
    let store = relay(increment_once).build().unwrap();

    assert_eq!(store.state(), &StateEnvelope::new(0));
}

#[test]
fn single_effect_is_handled_once() {
    let mut store = relay(increment_once)
        .middleware(counter_runner())
        .build()
        .unwrap();

    store.dispatch(Record::new("INCREMENT")).unwrap();

    assert_eq!(store.state(), &StateEnvelope::new(1));
}

#[test]
fn nested_effects_are_each_handled_once() {
    let mut store = relay(increment_nested)
        .middleware(counter_runner())
        .history_capacity(32)
        .build()
        .unwrap();

    store.dispatch(Record::new("INCREMENT")).unwrap();
    assert_eq!(store.state().state, Some(4));
    assert_eq!(store.history().effect_count("INCREMENT"), 4);

    store.dispatch(Record::new("INCREMENT")).unwrap();
    assert_eq!(store.state().state, Some(8));
    assert!(!store.state().has_effect());
}

#[test]
fn dispatch_effect_replays_embedded_action() {
    let mut store = relay(increment_via_dispatch)
        .middleware(EffectRunner::new().with_dispatch_rule())
        .build()
        .unwrap();

    store.dispatch(Record::new("INCREMENT")).unwrap();

    assert_eq!(store.state(), &StateEnvelope::new(1));
}

#[test]
fn reduction_order_interleaves_carriers_and_follow_ups() {
    let mut store = relay(increment_nested)
        .middleware(counter_runner())
        .history_capacity(32)
        .build()
        .unwrap();

    store.dispatch(Record::new("INCREMENT")).unwrap();

    let trace: Vec<String> = store
        .history()
        .messages()
        .into_iter()
        .map(|m| match m {
            Message::Action(r) => r.kind().to_string(),
            Message::Effect(r) => format!("effect:{}", r.kind()),
        })
        .collect();
    let mut expected = vec!["INCREMENT".to_string()];
    for _ in 0..4 {
        expected.push("effect:INCREMENT".to_string());
        expected.push("ACTUALLY_INCREMENT".to_string());
    }
    assert_eq!(trace, expected);
}

#[test]
fn subscribers_observe_every_reduction() {
    let mut store = relay(increment_once)
        .middleware(counter_runner())
        .build()
        .unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let id = store.subscribe(move |envelope: &Envelope| {
        sink.borrow_mut().push((envelope.state, envelope.has_effect()));
    });

    store.dispatch(Record::new("INCREMENT")).unwrap();
    assert_eq!(
        *seen.borrow(),
        vec![(Some(0), true), (Some(0), false), (Some(1), false)]
    );

    assert!(store.unsubscribe(id));
    store.dispatch(Record::new("INCREMENT")).unwrap();
    assert_eq!(seen.borrow().len(), 3);
}

#[test]
fn self_retriggering_effect_hits_depth_limit() {
    fn again(_effect: &Record, api: &mut Dispatcher<'_, Envelope>) -> Result<(), DispatchError> {
        api.dispatch_action(Record::new("INCREMENT"))?;
        Ok(())
    }

    let mut store = relay(increment_once)
        .middleware(EffectRunner::new().on_effect("INCREMENT", again))
        .max_dispatch_depth(16)
        .build()
        .unwrap();

    let err = store.dispatch(Record::new("INCREMENT")).unwrap_err();

    assert!(matches!(err, DispatchError::DepthExceeded { limit: 16, .. }));
    assert_eq!(store.depth(), 0);
}

fn json_counter(input: Value) -> Value {
    let count = input["state"].as_i64().unwrap_or(0);
    match input["action"]["type"].as_str() {
        Some("INCREMENT") => json!({
            "state": count,
            "result": {"effect": {"type": "DISPATCH", "action": {"type": "ACTUALLY_INCREMENT"}}}
        }),
        Some("ACTUALLY_INCREMENT") => json!({"state": count + 1, "result": {"effect": null}}),
        _ => json!({"state": count, "result": {"effect": null}}),
    }
}

#[test]
fn json_model_runs_through_the_relay() {
    let mut store = relay::<Value, _>(JsonModel::new(json_counter))
        .middleware(EffectRunner::new().with_dispatch_rule())
        .build()
        .unwrap();

    store.dispatch(Record::new("INCREMENT")).unwrap();
    store.dispatch(Record::new("INCREMENT")).unwrap();

    assert_eq!(store.state().state, Some(json!(2)));
}

#[test]
fn json_model_without_result_is_rejected() {
    fn broken(input: Value) -> Value {
        match input["action"]["type"].as_str() {
            Some("BREAK") => json!({"state": 0}),
            _ => json!({"state": 0, "result": {"effect": null}}),
        }
    }

    let mut store = relay::<Value, _>(JsonModel::new(broken)).build().unwrap();
    let err = store.dispatch(Record::new("BREAK")).unwrap_err();

    assert!(matches!(
        err,
        DispatchError::Model(ModelError::MalformedOutput(_))
    ));
    assert_eq!(store.state().state, Some(json!(0)));
}

fn deeply_nested(input: ModelInput<'_, i64>) -> Result<ModelOutput<i64>, ModelError> {
    let count = input.state.copied().unwrap_or(0);
    if input.action.kind() != "DEEP" {
        return Ok(ModelOutput::new(count));
    }
    let mut effect = Effect::from(Record::new("LEAF"));
    for _ in 0..200_000 {
        effect = Effect::Sequence(vec![effect]);
    }
    Ok(ModelOutput::new(count + 1).with_effect(effect))
}

#[test]
fn overly_nested_effect_is_rejected_without_crashing() {
    let mut store = relay(deeply_nested)
        .middleware(counter_runner())
        .history_capacity(8)
        .build()
        .unwrap();

    let err = store.dispatch(Record::new("DEEP")).unwrap_err();

    assert!(matches!(
        err,
        DispatchError::Model(ModelError::MalformedOutput(_))
    ));
    assert_eq!(store.state(), &StateEnvelope::new(0));
    assert!(store.history().entries().is_empty());
}
