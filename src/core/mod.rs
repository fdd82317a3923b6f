//! Core relay types and logic.
//!
//! This module contains the pure, synchronous part of the relay:
//! - Records and the two message kinds (actions and effect carriers)
//! - Effect values and their order-preserving flattening
//! - The model contract and the reducer adapter built on it
//! - Immutable-style dispatch history
//!
//! Nothing here performs I/O or dispatches messages; that belongs to the
//! store and the pipelines.

mod effect;
mod envelope;
mod log;
mod matcher;
mod message;
mod model;
mod record;
mod reducer;

pub use effect::{Effect, Leaves, DISPATCH, MAX_EFFECT_DEPTH};
pub use envelope::StateEnvelope;
pub use log::{DispatchEntry, DispatchLog};
pub use matcher::{match_effect, Matcher};
pub use message::{is_effect_carrier, mark_as_effect, Message, EFFECT_MARKER, INIT};
pub use model::{JsonModel, Model, ModelError, ModelInput, ModelOutput, ModelResult};
pub use reducer::{make_reducer, Reducer};
pub use record::Record;
