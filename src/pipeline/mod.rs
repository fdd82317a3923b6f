//! Effect execution pipelines.
//!
//! The [`EffectDispatcher`] turns the effect left in a store's mailbox into
//! effect carriers. Everything else here interprets those carriers:
//!
//! - [`EffectRunner`]: synchronous rules that run inside the dispatch
//! - [`DeferredRunner`]: queues carriers and runs Stillwater effects for them
//!   when drained
//!
//! Install the dispatcher before any pipeline so pipelines observe carriers
//! after they have been reduced. [`relay`](crate::builder::relay) does this.

mod deferred;
mod dispatcher;
mod runner;

pub use deferred::{DeferredHandler, DeferredRunner};
pub use dispatcher::EffectDispatcher;
pub use runner::{dispatch_rule, EffectHandler, EffectRunner, Rule};
