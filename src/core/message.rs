//! Messages flowing through the store: ordinary actions and effect carriers.

use super::record::Record;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Reserved key that marks an effect carrier in the wire form of a message.
///
/// Ordinary records must never use this key; doing so is a caller contract
/// violation that is not detected at runtime.
pub const EFFECT_MARKER: &str = "@@effect-relay/effect";

/// Discriminator of the message the store dispatches to itself on creation.
pub const INIT: &str = "@@effect-relay/INIT";

/// A message dispatched through the store.
///
/// The two kinds are disjoint by construction:
///
/// - `Action` drives real state transitions and reaches the model.
/// - `Effect` re-injects a computed effect into the message stream. The
///   reducer treats it as a no-op and execution pipelines interpret it.
///
/// # Example
///
/// ```rust
/// use effect_relay::core::{mark_as_effect, Message, Record};
///
/// let effect = Record::new("FETCH");
/// let carrier = mark_as_effect(&effect);
///
/// assert!(carrier.is_effect_carrier());
/// assert!(!Message::action(Record::new("FETCH")).is_effect_carrier());
/// assert_eq!(carrier.kind(), "FETCH");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    /// Ordinary input produced by the application or by an effect handler.
    Action(Record),
    /// Effect carrier synthesized by the effect dispatcher.
    Effect(Record),
}

impl Message {
    /// Wrap a record as an ordinary action.
    pub fn action(record: Record) -> Self {
        Self::Action(record)
    }

    pub(crate) fn init() -> Self {
        Self::Action(Record::new(INIT))
    }

    /// The carried record's `type`.
    pub fn kind(&self) -> &str {
        self.record().kind()
    }

    /// The carried record, whichever variant this is.
    pub fn record(&self) -> &Record {
        match self {
            Self::Action(record) | Self::Effect(record) => record,
        }
    }

    /// Unwrap the carried record, dropping the message kind.
    pub fn into_record(self) -> Record {
        match self {
            Self::Action(record) | Self::Effect(record) => record,
        }
    }

    /// True for messages synthesized by [`mark_as_effect`].
    pub fn is_effect_carrier(&self) -> bool {
        matches!(self, Self::Effect(_))
    }
}

impl From<Record> for Message {
    fn from(record: Record) -> Self {
        Self::Action(record)
    }
}

/// Build an effect carrier for `effect` without consuming it.
pub fn mark_as_effect(effect: &Record) -> Message {
    Message::Effect(effect.clone())
}

/// True iff `message` is an effect carrier.
pub fn is_effect_carrier(message: &Message) -> bool {
    message.is_effect_carrier()
}

/// JavaScript truthiness, used when reading the marker from the wire.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl Serialize for Message {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let mut object = self.record().clone().into_object();
        if self.is_effect_carrier() {
            object.insert(EFFECT_MARKER.to_string(), Value::Bool(true));
        }
        object.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut object = Map::<String, Value>::deserialize(deserializer)?;
        let carrier = object
            .remove(EFFECT_MARKER)
            .is_some_and(|marker| is_truthy(&marker));
        let record = Record::from_object(object)
            .map_err(|_| D::Error::custom("message must have a string `type` field"))?;

        Ok(if carrier {
            Message::Effect(record)
        } else {
            Message::Action(record)
        })
    }
}
