//! Effect values: inert descriptions of work computed by the model.
//!
//! An effect is either absent, a single record, or a nested ordered sequence
//! of effects. Flattening walks the tree depth-first, left-to-right, with an
//! explicit stack. Dropping and converting from JSON are iterative too; the
//! derived `Clone`, `PartialEq`, `Debug` and `Serialize` recurse, which is why
//! the reducer rejects effects nested deeper than [`MAX_EFFECT_DEPTH`].

use super::record::Record;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::{mem, slice, vec};

/// Discriminator of the built-in effect that replays an embedded action.
pub const DISPATCH: &str = "DISPATCH";

/// Deepest sequence nesting a model may return; deeper effects are rejected
/// as malformed output.
pub const MAX_EFFECT_DEPTH: usize = 1024;

/// Effect computed by a model step.
///
/// # Example
///
/// ```rust
/// use effect_relay::core::{Effect, Record};
///
/// let a = Record::new("A");
/// let b = Record::new("B");
/// let c = Record::new("C");
///
/// let nested = Effect::from(vec![
///     Effect::from(a.clone()),
///     Effect::from(vec![Effect::from(b.clone()), Effect::Empty, Effect::from(c.clone())]),
/// ]);
///
/// assert_eq!(nested.flatten(), vec![a, b, c]);
/// assert!(Effect::Empty.is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Effect {
    /// No effect.
    #[default]
    Empty,
    /// A single effect record.
    Leaf(Record),
    /// Ordered sequence of effects, possibly nested.
    Sequence(Vec<Effect>),
}

impl Effect {
    /// The built-in `DISPATCH` effect: replay `action` as an ordinary message.
    pub fn dispatch(action: Record) -> Self {
        Self::Leaf(Record::new(DISPATCH).with("action", action))
    }

    /// True iff flattening yields no leaf records.
    pub fn is_empty(&self) -> bool {
        self.leaves().next().is_none()
    }

    /// Depth-first, left-to-right iterator over leaf records.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves {
            stack: vec![slice::from_ref(self).iter()],
        }
    }

    /// Collect the leaf records in order.
    pub fn flatten(&self) -> Vec<Record> {
        self.leaves().cloned().collect()
    }

    /// Number of nested sequence levels; 0 for `Empty` and single leaves.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0)];
        while let Some((effect, level)) = stack.pop() {
            if let Effect::Sequence(items) = effect {
                deepest = deepest.max(level + 1);
                stack.extend(items.iter().map(|item| (item, level + 1)));
            }
        }
        deepest
    }

    /// Leaf for a value that is neither null, a sequence, nor a typed record.
    fn malformed(value: Value) -> Self {
        Self::Leaf(Record::new("").with("value", value))
    }
}

/// Iterator returned by [`Effect::leaves`].
#[derive(Debug)]
pub struct Leaves<'a> {
    stack: Vec<slice::Iter<'a, Effect>>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(top) = self.stack.last_mut() {
            match top.next() {
                None => {
                    self.stack.pop();
                }
                Some(Effect::Empty) => {}
                Some(Effect::Leaf(record)) => return Some(record),
                Some(Effect::Sequence(items)) => self.stack.push(items.iter()),
            }
        }
        None
    }
}

impl From<Record> for Effect {
    fn from(record: Record) -> Self {
        Self::Leaf(record)
    }
}

impl From<Vec<Effect>> for Effect {
    fn from(effects: Vec<Effect>) -> Self {
        Self::Sequence(effects)
    }
}

impl From<Vec<Record>> for Effect {
    fn from(records: Vec<Record>) -> Self {
        Self::Sequence(records.into_iter().map(Self::Leaf).collect())
    }
}

impl From<Option<Record>> for Effect {
    fn from(record: Option<Record>) -> Self {
        record.map_or(Self::Empty, Self::Leaf)
    }
}

/// Tears nested sequences down one level at a time.
impl Drop for Effect {
    fn drop(&mut self) {
        let Effect::Sequence(items) = self else {
            return;
        };
        let mut pending = mem::take(items);
        while let Some(mut effect) = pending.pop() {
            if let Effect::Sequence(children) = &mut effect {
                pending.append(children);
            }
        }
    }
}

/// Total conversion: any JSON value is a valid effect.
///
/// `null` is no effect and arrays are sequences. An object with a string `type`
/// is a record. Anything else becomes a single leaf of kind `""` holding the
/// raw value under `"value"`. Arrays are unpacked with an explicit stack.
impl From<Value> for Effect {
    fn from(value: Value) -> Self {
        let mut open: Vec<(Vec<Effect>, vec::IntoIter<Value>)> = Vec::new();
        let mut next = Some(value);

        loop {
            let effect = match next.take() {
                Some(Value::Array(items)) => {
                    open.push((Vec::with_capacity(items.len()), items.into_iter()));
                    continue;
                }
                Some(Value::Null) => Self::Empty,
                Some(Value::Object(object)) => match Record::from_object(object) {
                    Ok(record) => Self::Leaf(record),
                    Err(object) => Self::malformed(Value::Object(object)),
                },
                Some(scalar) => Self::malformed(scalar),
                None => {
                    let Some((_, rest)) = open.last_mut() else {
                        return Self::Empty;
                    };
                    if let Some(item) = rest.next() {
                        next = Some(item);
                        continue;
                    }
                    match open.pop() {
                        Some((items, _)) => Self::Sequence(items),
                        None => return Self::Empty,
                    }
                }
            };

            match open.last_mut() {
                Some((items, _)) => items.push(effect),
                None => return effect,
            }
        }
    }
}

impl<'de> Deserialize<'de> for Effect {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}
