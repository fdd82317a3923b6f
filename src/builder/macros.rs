//! Macros for ergonomic record construction.

/// Build a [`Record`](crate::core::Record) from a type and `key = value` fields.
///
/// Values can be anything convertible into `serde_json::Value`, including
/// other records.
///
/// # Example
///
/// ```
/// use effect_relay::record;
///
/// let action = record!("DISPATCH", action = record!("ACTUALLY_INCREMENT", by = 2));
///
/// assert_eq!(action.kind(), "DISPATCH");
/// assert_eq!(action.field("action").unwrap()["by"], 2);
/// ```
#[macro_export]
macro_rules! record {
    ($kind:expr $(, $field:ident = $value:expr)* $(,)?) => {
        $crate::core::Record::new($kind)$(.with(stringify!($field), $value))*
    };
}
