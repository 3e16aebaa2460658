//! Proptest generators for property-based testing.

use proptest::prelude::*;

use kavach_ledger_core::{Payload, Value, TIMESTAMP_KEY};

/// Generate a finite float, including negative zero and subnormals.
pub fn finite_f64() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(0.0),
        Just(-0.0),
        Just(1e16),
        Just(1e-5),
        any::<f64>().prop_filter("finite", |f| f.is_finite()),
    ]
}

/// Generate a payload key. Never produces `timestamp` or `tampered`.
pub fn key() -> impl Strategy<Value = String> {
    "[a-z_]{1,6}".prop_map(String::from)
}

/// Generate a scalar value.
pub fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        finite_f64().prop_map(Value::Float),
        any::<String>().prop_map(Value::String),
    ]
}

/// Generate a value, nesting arrays and maps a few levels deep.
pub fn value_strategy() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map(key(), inner, 0..4).prop_map(Value::Map),
        ]
    })
}

/// Generate a timestamp string in the ledger's usual format.
pub fn timestamp() -> impl Strategy<Value = String> {
    (0u32..60, 0u32..1_000_000)
        .prop_map(|(s, us)| format!("2025-01-01T00:00:{s:02}.{us:06}Z"))
}

/// Generate an appendable payload: arbitrary fields plus a string timestamp.
pub fn payload_strategy() -> impl Strategy<Value = Payload> {
    (prop::collection::btree_map(key(), value_strategy(), 0..5), timestamp()).prop_map(
        |(mut fields, ts)| {
            fields.insert(TIMESTAMP_KEY.to_string(), Value::String(ts));
            fields
        },
    )
}

/// Generate a non-empty run of `(event_type, payload)` appends.
pub fn events(max: usize) -> impl Strategy<Value = Vec<(String, Payload)>> {
    prop::collection::vec(("[a-z_]{1,16}", payload_strategy()), 1..=max)
}
