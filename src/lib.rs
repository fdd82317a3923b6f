//! Effect Relay: run pure models inside a Redux-style store
//!
//! A model is a pure function `(state, action) -> (state, effect)`. The relay
//! keeps the model pure and still gets its effects executed:
//!
//! - The reducer adapter stores the model's state and leaves the effect in
//!   the envelope's mailbox.
//! - The [`EffectDispatcher`] middleware flattens that effect and dispatches
//!   one effect carrier per leaf, in order.
//! - The reducer ignores carriers except to clear the mailbox, so each effect
//!   is emitted exactly once.
//! - Execution pipelines ([`EffectRunner`], [`pipeline::DeferredRunner`])
//!   match carriers by type and perform the real work, usually dispatching
//!   ordinary actions describing the outcome.
//!
//! # Core Concepts
//!
//! - **Record**: a `{type, ...fields}` JSON object used for actions and effects
//! - **Message**: an ordinary action or an effect carrier
//! - **Effect**: nothing, a record, or a nested sequence of effects
//! - **StateEnvelope**: the store state, `{state, effect}`
//!
//! # Example
//!
//! ```rust
//! use effect_relay::core::{Effect, ModelError, ModelInput, ModelOutput, Record};
//! use effect_relay::{relay, EffectRunner};
//!
//! fn counter(input: ModelInput<'_, i64>) -> Result<ModelOutput<i64>, ModelError> {
//!     let count = input.state.copied().unwrap_or(0);
//!     Ok(match input.action.kind() {
//!         "INCREMENT" => ModelOutput::new(count).with_effect(Effect::from(vec![
//!             Effect::from(Record::new("INCREMENT")),
//!             Effect::from(vec![Effect::from(Record::new("INCREMENT"))]),
//!         ])),
//!         "ACTUALLY_INCREMENT" => ModelOutput::new(count + 1),
//!         _ => ModelOutput::new(count),
//!     })
//! }
//!
//! let runner = EffectRunner::new().on_effect("INCREMENT", |_effect, api| {
//!     api.dispatch_action(Record::new("ACTUALLY_INCREMENT"))?;
//!     Ok(())
//! });
//!
//! let mut store = relay(counter).middleware(runner).build().unwrap();
//! store.dispatch(Record::new("INCREMENT")).unwrap();
//!
//! assert_eq!(store.state().state, Some(2));
//! assert!(!store.state().has_effect());
//! ```

pub mod builder;
pub mod core;
pub mod pipeline;
pub mod store;

// Re-export commonly used types
pub use builder::{relay, BuildError, StoreBuilder};
pub use crate::core::{
    is_effect_carrier, make_reducer, mark_as_effect, match_effect, Effect, Message, Model,
    Record, StateEnvelope,
};
pub use pipeline::{EffectDispatcher, EffectRunner};
pub use store::{DispatchError, Dispatcher, Middleware, Store, StoreConfig};
