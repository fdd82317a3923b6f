//! Effectful Counter
//!
//! This example runs a pure counter model inside a store and lets two
//! execution pipelines carry out the effects it describes.
//!
//! Key concepts:
//! - The model only describes work (`INCREMENT`, `DISPATCH`, `SAVE` effects)
//! - The synchronous runner handles `INCREMENT` inside the dispatch
//! - The built-in `DISPATCH` rule replays embedded actions
//! - The deferred runner queues `SAVE` and runs it later against an environment
//!
//! Run with: cargo run --example counter

use effect_relay::core::{Effect, Message, ModelError, ModelInput, ModelOutput, Record};
use effect_relay::pipeline::DeferredRunner;
use effect_relay::{record, relay, EffectRunner};
use std::sync::Arc;
use stillwater::prelude::*;

// Pure model: never performs work, only returns the next state and an effect
fn counter(input: ModelInput<'_, i64>) -> Result<ModelOutput<i64>, ModelError> {
    let count = input.state.copied().unwrap_or(0);
    let action = input.action;

    Ok(match action.kind() {
        "INCREMENT" => ModelOutput::new(count).with_effect(Effect::from(vec![
            Effect::from(record!("INCREMENT")),
            Effect::from(vec![Effect::from(record!("INCREMENT"))]),
        ])),
        "ACTUALLY_INCREMENT" => ModelOutput::new(count + 1),
        "RESET" => ModelOutput::new(count)
            .with_effect(Effect::dispatch(record!("SET", value = 0)))
            .with_data("reset requested"),
        "SET" => {
            let value = action.field("value").and_then(|v| v.as_i64());
            ModelOutput::new(value.unwrap_or(count))
        }
        "SAVE" => ModelOutput::new(count).with_effect(record!("SAVE", value = count)),
        "SAVED" => ModelOutput::new(count),
        _ => ModelOutput::new(count),
    })
}

// Environment for deferred work
#[derive(Clone)]
struct Storage {
    name: &'static str,
}

#[tokio::main]
async fn main() {
    println!("=== Effectful Counter Example ===\n");

    let runner = EffectRunner::new()
        .on_effect("INCREMENT", |_effect, api| {
            println!("  [Runner] INCREMENT effect -> ACTUALLY_INCREMENT");
            api.dispatch_action(record!("ACTUALLY_INCREMENT"))?;
            Ok(())
        })
        .with_dispatch_rule();

    let saver = Arc::new(DeferredRunner::<Storage>::new().on_effect("SAVE", |effect| {
        let value = effect.field("value").cloned().unwrap_or_default();
        from_fn(move |storage: &Storage| {
            println!("  [Storage:{}] saved {}", storage.name, value);
            Ok(vec![Message::action(record!("SAVED", value = value.clone()))])
        })
        .boxed()
    }));

    let mut store = match relay(counter)
        .middleware(runner)
        .shared_middleware(saver.clone())
        .history_capacity(64)
        .build()
    {
        Ok(store) => store,
        Err(e) => {
            println!("Failed to build store: {}", e);
            return;
        }
    };

    store.subscribe(|envelope| {
        if let Some(count) = envelope.state {
            println!("  [Subscriber] count = {}", count);
        }
    });

    println!("Dispatching INCREMENT (two nested effects)");
    if let Err(e) = store.dispatch(record!("INCREMENT")) {
        println!("Dispatch failed: {}", e);
    }

    println!("\nDispatching SAVE (deferred)");
    if let Err(e) = store.dispatch(Record::new("SAVE")) {
        println!("Dispatch failed: {}", e);
    }
    println!("  Pending deferred jobs: {}", saver.pending());

    match saver.drain(&mut store, &Storage { name: "memory" }).await {
        Ok(count) => println!("  Drained {} deferred job(s)", count),
        Err(e) => println!("Drain failed: {}", e),
    }

    println!("\nDispatching RESET (via DISPATCH effect)");
    if let Err(e) = store.dispatch(record!("RESET")) {
        println!("Dispatch failed: {}", e);
    }

    println!("\nDispatch log:");
    for entry in store.history().entries() {
        let marker = if entry.message.is_effect_carrier() {
            "effect"
        } else {
            "action"
        };
        println!(
            "  depth {} {:>6} {}",
            entry.depth,
            marker,
            entry.message.kind()
        );
    }

    println!("\nFinal count: {:?}", store.state().state);
}
