//! Golden test vectors for deterministic verification.
//!
//! The vectors form one chain, appended in order. Any implementation of the
//! ledger format must reproduce these canonical bytes and digests exactly.

use serde_json::json;

use kavach_ledger_core::{
    canonical_payload_bytes, compute_payload_hash, payload_from_json, HashChain, Payload,
};

/// SHA-256 of the canonical empty payload `{}`.
pub const EMPTY_PAYLOAD_HASH: &str =
    "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a";

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Event type passed to append.
    pub event_type: &'static str,
    /// Payload passed to append.
    pub payload: Payload,
    /// Expected canonical payload encoding.
    pub expected_canonical: &'static str,
    /// Expected payload hash (hex).
    pub expected_payload_hash: &'static str,
    /// Expected predecessor link (hex).
    pub expected_prev_chain_hash: &'static str,
    /// Expected chain hash (hex).
    pub expected_chain_hash: &'static str,
}

fn payload(json: serde_json::Value) -> Payload {
    // Vector payloads are literal maps with finite numbers.
    payload_from_json(json).expect("golden payloads are valid")
}

/// Get all golden test vectors, in append order.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "genesis login",
            event_type: "login",
            payload: payload(json!({ "timestamp": "T1" })),
            expected_canonical: r#"{"timestamp":"T1"}"#,
            expected_payload_hash:
                "0f959b682442c1525fa74a474dc4a5720d953b523a88f76399c2adeac9c56566",
            expected_prev_chain_hash:
                "0000000000000000000000000000000000000000000000000000000000000000",
            expected_chain_hash:
                "d73e312b1c9fd847ecf29dac684ea1ae7b93da1f918f3896720a3dd389aa65e8",
        },
        GoldenVector {
            name: "dispatch after login",
            event_type: "dispatch",
            payload: payload(json!({ "timestamp": "T2" })),
            expected_canonical: r#"{"timestamp":"T2"}"#,
            expected_payload_hash:
                "01baf20124186e55c0193f70f4e011481fb8e505140f0c4ab906371811307810",
            expected_prev_chain_hash:
                "d73e312b1c9fd847ecf29dac684ea1ae7b93da1f918f3896720a3dd389aa65e8",
            expected_chain_hash:
                "b22ea807008e549534fbae842e9c4305e5539d23802074fcfef4d670fa10b012",
        },
        GoldenVector {
            name: "nested payload with non-ascii text",
            event_type: "command_intercept",
            payload: payload(json!({
                "timestamp": "2025-01-01T00:00:00.000000Z",
                "command": "intercept",
                "coordinates": { "lon": 77.6, "lat": 28.5 },
                "operator": "\u{0394}-ops \u{1F681}",
                "count": 3,
                "tags": ["a", "b"],
                "ok": true,
                "note": null,
            })),
            expected_canonical: concat!(
                r#"{"command":"intercept","coordinates":{"lat":28.5,"lon":77.6},"count":3,"#,
                r#""note":null,"ok":true,"operator":"\u0394-ops \ud83d\ude81","#,
                r#""tags":["a","b"],"timestamp":"2025-01-01T00:00:00.000000Z"}"#,
            ),
            expected_payload_hash:
                "0e66c034dd7a63ba216b5783fd63f0fd7a06f12a5aff1b4bc71778d12183bcd0",
            expected_prev_chain_hash:
                "b22ea807008e549534fbae842e9c4305e5539d23802074fcfef4d670fa10b012",
            expected_chain_hash:
                "dda9d0897e675468fcbfffd8421dc3ab2c3e3dcda0e7fbf294ae3c2a4d179ee7",
        },
    ]
}

/// Append every vector to a fresh chain and compare against the expected
/// bytes and digests.
pub fn verify_all_vectors() -> Result<(), String> {
    let empty = compute_payload_hash(&Payload::new()).map_err(|e| e.to_string())?;
    if empty.to_hex() != EMPTY_PAYLOAD_HASH {
        return Err(format!("empty payload: got {empty}"));
    }

    let mut chain = HashChain::new();
    for vector in all_vectors() {
        let canonical = canonical_payload_bytes(&vector.payload).map_err(|e| e.to_string())?;
        if canonical != vector.expected_canonical.as_bytes() {
            return Err(format!(
                "{}: canonical mismatch, got {}",
                vector.name,
                String::from_utf8_lossy(&canonical)
            ));
        }

        let entry = chain
            .append(vector.event_type, vector.payload.clone())
            .map_err(|e| format!("{}: {e}", vector.name))?;

        let checks = [
            ("payload_hash", entry.payload_hash, vector.expected_payload_hash),
            ("prev_chain_hash", entry.prev_chain_hash, vector.expected_prev_chain_hash),
            ("chain_hash", entry.chain_hash, vector.expected_chain_hash),
        ];
        for (field, got, expected) in checks {
            if got.to_hex() != expected {
                return Err(format!(
                    "{}: {field} mismatch, expected {expected}, got {got}",
                    vector.name
                ));
            }
        }
    }

    let result = chain.verify_full();
    if !result.valid {
        return Err(format!("golden chain failed verification: {result:?}"));
    }
    Ok(())
}
