//! Builder API for ergonomic store construction.
//!
//! This module provides the fluent [`StoreBuilder`], the [`relay`] shortcut
//! that wires a model to the effect dispatcher, and the `record!` macro.

pub mod error;
pub mod macros;
pub mod store;

pub use error::BuildError;
pub use store::StoreBuilder;

use crate::core::{make_reducer, Model, StateEnvelope};
use crate::pipeline::EffectDispatcher;

/// Start a store around `model` with the effect dispatcher installed.
///
/// Execution pipelines added afterwards run after the dispatcher, the same
/// order as installing the dispatcher first in a middleware list.
///
/// # Example
///
/// ```
/// use effect_relay::builder::relay;
/// use effect_relay::core::{Effect, ModelError, ModelInput, ModelOutput, Record};
/// use effect_relay::pipeline::EffectRunner;
///
/// fn model(input: ModelInput<'_, i64>) -> Result<ModelOutput<i64>, ModelError> {
///     let state = input.state.copied().unwrap_or(0);
///     Ok(match input.action.kind() {
///         "INCREMENT" => {
///             ModelOutput::new(state).with_effect(Effect::dispatch(Record::new("ACTUALLY_INCREMENT")))
///         }
///         "ACTUALLY_INCREMENT" => ModelOutput::new(state + 1),
///         _ => ModelOutput::new(state),
///     })
/// }
///
/// let mut store = relay(model)
///     .middleware(EffectRunner::new().with_dispatch_rule())
///     .build()
///     .unwrap();
///
/// store.dispatch(Record::new("INCREMENT")).unwrap();
/// assert_eq!(store.state().state, Some(1));
/// assert!(!store.state().has_effect());
/// ```
pub fn relay<S, M>(model: M) -> StoreBuilder<StateEnvelope<S>>
where
    S: Clone + 'static,
    M: Model<S> + 'static,
{
    StoreBuilder::new()
        .reducer(make_reducer(model))
        .middleware(EffectDispatcher::new())
}
