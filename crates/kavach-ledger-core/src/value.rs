//! Payload value model.
//!
//! Payloads are trees of [`Value`]. The variant set is closed so that the
//! canonical encoder is total over it; the only value it refuses is a
//! non-finite float.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::LedgerError;

/// The top level of every ledger payload: a mapping of string keys.
pub type Payload = BTreeMap<String, Value>;

/// Key of the payload field that is bound into the chain hash.
pub const TIMESTAMP_KEY: &str = "timestamp";

/// A JSON-like payload value.
///
/// `Integer` and `Float` are distinct: `1` and `1.0` encode differently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Borrow the string content, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the mapping, if this is a map.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = LedgerError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        from_json_at(json, "root")
    }
}

fn from_json_at(json: serde_json::Value, path: &str) -> Result<Value, LedgerError> {
    Ok(match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if is_integer_literal(&n) {
                return Err(LedgerError::invalid_payload(
                    path,
                    format!("integer {n} exceeds the signed 64-bit range"),
                ));
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() => Value::Float(f),
                    _ => {
                        return Err(LedgerError::invalid_payload(path, "non-finite number"));
                    }
                }
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => Value::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| from_json_at(item, &format!("{path}[{i}]")))
                .collect::<Result<_, _>>()?,
        ),
        serde_json::Value::Object(obj) => Value::Map(
            obj.into_iter()
                .map(|(k, v)| {
                    let child = from_json_at(v, &format!("{path}.{k}"))?;
                    Ok((k, child))
                })
                .collect::<Result<_, LedgerError>>()?,
        ),
    })
}

/// Whether a JSON number was written without a fraction or exponent.
fn is_integer_literal(n: &serde_json::Number) -> bool {
    !n.to_string().contains(['.', 'e', 'E'])
}

impl From<Value> for serde_json::Value {
    /// Non-finite floats have no JSON form and become `null`; such a value
    /// could never have been appended in the first place.
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Integer(i) => serde_json::Value::Number(i.into()),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::String(s) => serde_json::Value::String(s),
            Value::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Map(map) => serde_json::Value::Object(
                map.into_iter().map(|(k, v)| (k, v.into())).collect(),
            ),
        }
    }
}

/// Convert a JSON object into a payload.
///
/// Fails with `InvalidPayload` when the JSON is not an object or holds a
/// number that has no [`Value`] form.
pub fn payload_from_json(json: serde_json::Value) -> Result<Payload, LedgerError> {
    match Value::try_from(json)? {
        Value::Map(map) => Ok(map),
        other => Err(LedgerError::invalid_payload(
            "root",
            format!("payload must be a map, got {}", other.kind()),
        )),
    }
}

/// Build a [`Payload`] from `key => value` pairs.
///
/// ```
/// use kavach_ledger_core::payload;
///
/// let p = payload! { "timestamp" => "T1", "count" => 3 };
/// assert_eq!(p.len(), 2);
/// ```
#[macro_export]
macro_rules! payload {
    () => { $crate::value::Payload::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::value::Payload::new();
        $( map.insert(::std::string::String::from($key), $crate::value::Value::from($value)); )+
        map
    }};
}
