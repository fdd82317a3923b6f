//! Tagged records: the payload shape shared by actions and effects.
//!
//! A record is a `type` discriminator plus arbitrary JSON fields. Both ordinary
//! actions and effect descriptions are records; what distinguishes them is the
//! [`Message`](super::Message) variant that carries them, never a field inside.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A `{type, ...fields}` record.
///
/// On the wire a record is a flat JSON object whose `"type"` key holds the
/// discriminator. All other keys are payload fields.
///
/// # Example
///
/// ```rust
/// use effect_relay::core::Record;
///
/// let action = Record::new("DISPATCH").with("action", Record::new("ACTUALLY_INCREMENT"));
///
/// assert_eq!(action.kind(), "DISPATCH");
/// assert_eq!(action.field("action").unwrap()["type"], "ACTUALLY_INCREMENT");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "type")]
    kind: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl Record {
    /// Create a record with the given discriminator and no fields.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fields: Map::new(),
        }
    }

    /// Return a copy of this record with `key` set to `value`.
    ///
    /// `type` is reserved for the discriminator and is never stored as a
    /// field; passing it leaves the record unchanged.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key == "type" {
            tracing::debug!(kind = %self.kind, "ignoring reserved `type` field");
            return self;
        }
        self.fields.insert(key, value.into());
        self
    }

    /// The `type` discriminator.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Look up a payload field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// All payload fields, excluding `type`.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Build a record from a JSON object, returning the object back if it has
    /// no string `type` key.
    pub(crate) fn from_object(mut object: Map<String, Value>) -> Result<Self, Map<String, Value>> {
        match object.remove("type") {
            Some(Value::String(kind)) => Ok(Self {
                kind,
                fields: object,
            }),
            Some(other) => {
                object.insert("type".to_string(), other);
                Err(object)
            }
            None => Err(object),
        }
    }

    pub(crate) fn into_object(self) -> Map<String, Value> {
        let mut object = self.fields;
        object.insert("type".to_string(), Value::String(self.kind));
        object
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.into_object())
    }
}
