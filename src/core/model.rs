//! The model contract: a pure step from (state, action) to (state, result).

use super::effect::Effect;
use super::record::Record;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Errors raised by a model step. They are never caught by this crate.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model step failed: {0}")]
    Failed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Malformed model output: {0}")]
    MalformedOutput(String),
}

impl ModelError {
    /// Wrap any error raised inside a model.
    pub fn failed(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Failed(error.into())
    }
}

/// Input to a model step.
#[derive(Clone, Copy, Debug)]
pub struct ModelInput<'a, S> {
    /// Previous state, `None` on the very first step.
    pub state: Option<&'a S>,
    /// The ordinary action being applied.
    pub action: &'a Record,
}

/// Result half of a model step. `data` is carried through untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    pub effect: Effect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Output of a model step: the next state and its result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelOutput<S> {
    pub state: S,
    pub result: ModelResult,
}

impl<S> ModelOutput<S> {
    /// Next state with no effect.
    pub fn new(state: S) -> Self {
        Self {
            state,
            result: ModelResult::default(),
        }
    }

    /// Set the effect returned alongside the state.
    pub fn with_effect(mut self, effect: impl Into<Effect>) -> Self {
        self.result.effect = effect.into();
        self
    }

    /// Attach extra result data; the relay passes it through untouched.
    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.result.data = Some(data.into());
        self
    }
}

impl<S: DeserializeOwned> ModelOutput<S> {
    /// Parse the JSON form `{"state": .., "result": {"effect": .., ..}}`.
    ///
    /// The `result.effect` key must be present; a `null` effect means none.
    /// Keys of `result` besides `effect` and `data` are ignored.
    pub fn from_value(value: Value) -> Result<Self, ModelError> {
        let Value::Object(mut output) = value else {
            return Err(ModelError::MalformedOutput(
                "output is not an object".to_string(),
            ));
        };
        let Some(Value::Object(mut result)) = output.remove("result") else {
            return Err(ModelError::MalformedOutput(
                "missing `result` object".to_string(),
            ));
        };
        let Some(effect) = result.remove("effect") else {
            return Err(ModelError::MalformedOutput(
                "missing `result.effect`".to_string(),
            ));
        };
        let state = output.remove("state").unwrap_or(Value::Null);
        let state = serde_json::from_value(state)
            .map_err(|e| ModelError::MalformedOutput(format!("invalid `state`: {e}")))?;

        Ok(Self {
            state,
            result: ModelResult {
                effect: Effect::from(effect),
                data: result.remove("data").filter(|d| !d.is_null()),
            },
        })
    }
}

/// A pure, deterministic state-transition function.
///
/// Implemented for any `Fn(ModelInput<'_, S>) -> Result<ModelOutput<S>, ModelError>`.
///
/// # Example
///
/// ```rust
/// use effect_relay::core::{Model, ModelError, ModelInput, ModelOutput, Record};
///
/// fn counter(input: ModelInput<'_, i64>) -> Result<ModelOutput<i64>, ModelError> {
///     let state = input.state.copied().unwrap_or(0);
///     Ok(match input.action.kind() {
///         "INCREMENT" => ModelOutput::new(state + 1),
///         _ => ModelOutput::new(state),
///     })
/// }
///
/// let action = Record::new("INCREMENT");
/// let output = counter.step(ModelInput { state: Some(&41), action: &action }).unwrap();
/// assert_eq!(output.state, 42);
/// ```
pub trait Model<S> {
    fn step(&self, input: ModelInput<'_, S>) -> Result<ModelOutput<S>, ModelError>;
}

impl<S, F> Model<S> for F
where
    F: Fn(ModelInput<'_, S>) -> Result<ModelOutput<S>, ModelError>,
{
    fn step(&self, input: ModelInput<'_, S>) -> Result<ModelOutput<S>, ModelError> {
        self(input)
    }
}

/// Adapter for models written against plain JSON.
///
/// The wrapped function receives `{"state": <state or null>, "action": <record>}`
/// and must return `{"state": .., "result": {"effect": .., ..}}`.
pub struct JsonModel<F> {
    step: F,
}

impl<F> JsonModel<F>
where
    F: Fn(Value) -> Value,
{
    pub fn new(step: F) -> Self {
        Self { step }
    }
}

impl<F> Model<Value> for JsonModel<F>
where
    F: Fn(Value) -> Value,
{
    fn step(&self, input: ModelInput<'_, Value>) -> Result<ModelOutput<Value>, ModelError> {
        let request = json!({
            "state": input.state.cloned().unwrap_or(Value::Null),
            "action": Value::from(input.action.clone()),
        });
        ModelOutput::from_value((self.step)(request))
    }
}
