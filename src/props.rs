//! Axis values and the props capability used during resolution.

use crate::errors::{Result, VariantError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hash};

/// A value on one variant axis.
///
/// The domain is closed and always comparable, so equality-based compound
/// matching can never hit a value that cannot be compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

/// The kind of an [`AxisValue`]; every value declared on one axis shares a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisKind {
    Bool,
    Int,
    Str,
}

impl AxisValue {
    pub fn kind(&self) -> AxisKind {
        match self {
            AxisValue::Bool(_) => AxisKind::Bool,
            AxisValue::Int(_) => AxisKind::Int,
            AxisValue::Str(_) => AxisKind::Str,
        }
    }

    /// Parse a mapping key from a config file.
    ///
    /// Object keys are always strings in JSON and YAML, so `"true"`/`"false"`
    /// become booleans and base-10 integers become `Int`.
    pub fn from_key(key: &str) -> Self {
        match key {
            "true" => AxisValue::Bool(true),
            "false" => AxisValue::Bool(false),
            _ => key
                .parse::<i64>()
                .map(AxisValue::Int)
                .unwrap_or_else(|_| AxisValue::Str(key.to_string())),
        }
    }

    /// Re-read a string as `kind` when it parses as one; other values are
    /// returned unchanged.
    pub fn coerce(self, kind: AxisKind) -> Self {
        if let AxisValue::Str(text) = &self {
            if kind != AxisKind::Str {
                let parsed = AxisValue::from_key(text);
                if parsed.kind() == kind {
                    return parsed;
                }
            }
        }
        self
    }

    /// Convert a JSON leaf. Anything other than a string, bool or i64 is a
    /// type mismatch and yields `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(AxisValue::Bool(*b)),
            Value::Number(n) => n.as_i64().map(AxisValue::Int),
            Value::String(s) => Some(AxisValue::Str(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for AxisValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisValue::Bool(b) => write!(f, "{}", b),
            AxisValue::Int(i) => write!(f, "{}", i),
            AxisValue::Str(s) => f.write_str(s),
        }
    }
}

impl fmt::Display for AxisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AxisKind::Bool => "bool",
            AxisKind::Int => "int",
            AxisKind::Str => "string",
        };
        f.write_str(name)
    }
}

impl From<&str> for AxisValue {
    fn from(value: &str) -> Self {
        AxisValue::Str(value.to_string())
    }
}

impl From<String> for AxisValue {
    fn from(value: String) -> Self {
        AxisValue::Str(value)
    }
}

impl From<&String> for AxisValue {
    fn from(value: &String) -> Self {
        AxisValue::Str(value.clone())
    }
}

impl From<bool> for AxisValue {
    fn from(value: bool) -> Self {
        AxisValue::Bool(value)
    }
}

impl From<i64> for AxisValue {
    fn from(value: i64) -> Self {
        AxisValue::Int(value)
    }
}

impl From<i32> for AxisValue {
    fn from(value: i32) -> Self {
        AxisValue::Int(i64::from(value))
    }
}

impl From<u32> for AxisValue {
    fn from(value: u32) -> Self {
        AxisValue::Int(i64::from(value))
    }
}

/// Read access to a runtime selection of axis values.
///
/// Resolution depends only on this capability, so props may be a key/value
/// map, a JSON object, a serializable record, or anything else that can
/// answer "what is the value of this axis".
pub trait Props {
    /// The explicit value for `axis`, if the props carry one.
    fn get(&self, axis: &str) -> Option<AxisValue>;

    /// True for the "no selection" sentinel. Resolution then yields the base
    /// class alone, without applying defaults.
    fn is_absent(&self) -> bool {
        false
    }
}

impl<P: Props + ?Sized> Props for &P {
    fn get(&self, axis: &str) -> Option<AxisValue> {
        (**self).get(axis)
    }

    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

impl<P: Props> Props for Option<P> {
    fn get(&self, axis: &str) -> Option<AxisValue> {
        self.as_ref().and_then(|props| props.get(axis))
    }

    fn is_absent(&self) -> bool {
        match self {
            Some(props) => props.is_absent(),
            None => true,
        }
    }
}

impl Props for () {
    fn get(&self, _axis: &str) -> Option<AxisValue> {
        None
    }

    fn is_absent(&self) -> bool {
        true
    }
}

impl<K, V, S> Props for HashMap<K, V, S>
where
    K: Borrow<str> + Eq + Hash,
    V: Clone + Into<AxisValue>,
    S: BuildHasher,
{
    fn get(&self, axis: &str) -> Option<AxisValue> {
        HashMap::get(self, axis).cloned().map(Into::into)
    }
}

impl<K, V> Props for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: Clone + Into<AxisValue>,
{
    fn get(&self, axis: &str) -> Option<AxisValue> {
        BTreeMap::get(self, axis).cloned().map(Into::into)
    }
}

impl<K, V, S> Props for IndexMap<K, V, S>
where
    K: Borrow<str> + Eq + Hash,
    V: Clone + Into<AxisValue>,
    S: BuildHasher,
{
    fn get(&self, axis: &str) -> Option<AxisValue> {
        IndexMap::get(self, axis).cloned().map(Into::into)
    }
}

/// Pair lists; the last pair naming an axis wins, as with map insertion.
impl<K, V> Props for [(K, V)]
where
    K: AsRef<str>,
    V: Clone + Into<AxisValue>,
{
    fn get(&self, axis: &str) -> Option<AxisValue> {
        self.iter()
            .rev()
            .find(|(key, _)| key.as_ref() == axis)
            .map(|(_, value)| value.clone().into())
    }
}

impl<K, V, const N: usize> Props for [(K, V); N]
where
    K: AsRef<str>,
    V: Clone + Into<AxisValue>,
{
    fn get(&self, axis: &str) -> Option<AxisValue> {
        Props::get(self.as_slice(), axis)
    }
}

impl<K, V> Props for Vec<(K, V)>
where
    K: AsRef<str>,
    V: Clone + Into<AxisValue>,
{
    fn get(&self, axis: &str) -> Option<AxisValue> {
        Props::get(self.as_slice(), axis)
    }
}

/// JSON props: objects are looked up by key and `null` is the sentinel.
impl Props for Value {
    fn get(&self, axis: &str) -> Option<AxisValue> {
        self.as_object()
            .and_then(|fields| fields.get(axis))
            .and_then(AxisValue::from_json)
    }

    fn is_absent(&self) -> bool {
        self.is_null()
    }
}

impl Props for serde_json::Map<String, Value> {
    fn get(&self, axis: &str) -> Option<AxisValue> {
        serde_json::Map::get(self, axis).and_then(AxisValue::from_json)
    }
}

/// Fixed-shape record adapter.
///
/// Captures the serialized fields of any `Serialize` struct so axes are read
/// as named attributes. Field names follow the struct's serde naming,
/// including any `rename` attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Option<serde_json::Map<String, Value>>,
}

impl Record {
    pub fn new<T: Serialize + ?Sized>(record: &T) -> Result<Self> {
        match serde_json::to_value(record)? {
            Value::Object(fields) => Ok(Self {
                fields: Some(fields),
            }),
            Value::Null => Ok(Self { fields: None }),
            other => Err(VariantError::InvalidInput(format!(
                "props record must serialize to an object, got {}",
                json_type_name(&other)
            ))),
        }
    }
}

impl Props for Record {
    fn get(&self, axis: &str) -> Option<AxisValue> {
        self.fields
            .as_ref()
            .and_then(|fields| fields.get(axis))
            .and_then(AxisValue::from_json)
    }

    fn is_absent(&self) -> bool {
        self.fields.is_none()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
