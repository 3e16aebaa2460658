//! Test fixtures and helpers.
//!
//! Common setup code for ledger tests.

use kavach_ledger_core::{payload, HashChain, Payload, Value};

/// Event types recorded by the surrounding security-operations services.
pub const OPS_EVENT_TYPES: [&str; 5] = [
    "command_intercept",
    "incident_opened",
    "threat_detected",
    "whitelist_added",
    "login",
];

/// A deterministic payload for the `i`-th event.
pub fn ops_payload(i: usize) -> Payload {
    payload! {
        "timestamp" => format!("2025-01-01T00:00:{:02}.000000Z", i % 60),
        "event_index" => i as i64,
        "operator" => "op-1",
        "confidence" => 0.5 + (i % 5) as f64 / 10.0,
    }
}

/// A chain of `n` deterministic security-operations events.
pub fn chain_of(n: usize) -> HashChain {
    let mut chain = HashChain::new();
    for i in 1..=n {
        let event_type = OPS_EVENT_TYPES[i % OPS_EVENT_TYPES.len()];
        // Fixture payloads always have a string timestamp and finite numbers.
        chain
            .append(event_type, ops_payload(i))
            .expect("fixture payloads are valid");
    }
    chain
}

/// The two-entry `login` / `dispatch` chain with timestamps `T1`, `T2`.
pub fn login_dispatch_chain() -> HashChain {
    let mut chain = HashChain::new();
    chain
        .append("login", payload! { "timestamp" => "T1" })
        .expect("fixture payloads are valid");
    chain
        .append("dispatch", payload! { "timestamp" => "T2" })
        .expect("fixture payloads are valid");
    chain
}

/// A payload exercising every value variant.
pub fn rich_payload() -> Payload {
    let mut coordinates = Payload::new();
    coordinates.insert("lat".into(), Value::Float(28.5));
    coordinates.insert("lon".into(), Value::Float(77.6));

    payload! {
        "timestamp" => "2025-01-01T00:00:00.000000Z",
        "command" => "intercept",
        "coordinates" => coordinates,
        "operator" => "\u{0394}-ops \u{1F681}",
        "count" => 3,
        "tags" => vec![Value::from("a"), Value::from("b")],
        "ok" => true,
        "note" => Value::Null,
    }
}
