//! End-to-end ledger behaviour: append, tamper, verify, report.

use std::sync::Once;
use std::thread;

use kavach_ledger::{
    payload, FixedClock, IntegrityViolation, Ledger, LedgerConfig, LedgerError, Payload,
    VerificationResult,
};
use kavach_ledger_testkit::tamper::{replace_payload, swap_entries};
use kavach_ledger_testkit::{ops_payload, tamper, TamperField, OPS_EVENT_TYPES};

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

fn fixed_ledger() -> Ledger {
    init_tracing();
    Ledger::with_clock(LedgerConfig::default(), FixedClock::new("2025-01-01T00:00:00.000000Z"))
}

fn ledger_of(n: usize) -> Ledger {
    let ledger = fixed_ledger();
    for i in 1..=n {
        ledger
            .append(OPS_EVENT_TYPES[i % OPS_EVENT_TYPES.len()], ops_payload(i))
            .unwrap();
    }
    ledger
}

#[test]
fn test_login_dispatch_scenario() {
    let ledger = fixed_ledger();
    let e1 = ledger.append("login", payload! { "timestamp" => "T1" }).unwrap();
    let e2 = ledger.append("dispatch", payload! { "timestamp" => "T2" }).unwrap();

    assert_eq!(e1.sequence_id, 1);
    assert_eq!(e2.sequence_id, 2);
    assert!(e1.prev_chain_hash.is_zero());
    assert_eq!(e2.prev_chain_hash, e1.chain_hash);
    assert_eq!(ledger.verify_full(), VerificationResult::ok(2));

    // Alter entry 1 in an exported copy and re-open it.
    let mut entries = ledger.entries(..);
    entries[0]
        .payload
        .insert("timestamp".into(), "T1-forged".into());
    let forged = Ledger::from_entries(LedgerConfig::default(), entries);

    let result = forged.verify_full();
    assert!(!result.valid);
    assert_eq!(result.first_failure_sequence_id, Some(1));
    assert_eq!(result.checked_count, 1);
    assert_eq!(result.failure, Some(IntegrityViolation::PayloadHashMismatch));

    // The live ledger is untouched.
    assert!(ledger.verify_full().valid);
}

#[test]
fn test_every_field_every_position() {
    let ledger = ledger_of(5);
    for field in TamperField::ALL {
        for k in 1..=5u64 {
            let mut entries = ledger.entries(..);
            assert!(tamper(&mut entries, k, field));
            let result = Ledger::from_entries(LedgerConfig::default(), entries).verify_full();
            assert!(!result.valid, "{field:?} at {k}");
            assert_eq!(result.first_failure_sequence_id, Some(k), "{field:?} at {k}");
            assert_eq!(result.checked_count, k);
        }
    }
}

#[test]
fn test_consistent_forgery_breaks_successor() {
    // Rewriting a payload and its payload hash still breaks the chain hash.
    let ledger = ledger_of(3);
    let mut entries = ledger.entries(..);
    let forged = payload! { "timestamp" => "2025-01-01T00:00:02.000000Z", "forged" => true };
    assert!(replace_payload(&mut entries, 2, forged.clone()));
    entries[1].payload_hash = kavach_ledger::core::compute_payload_hash(&forged).unwrap();

    let result = Ledger::from_entries(LedgerConfig::default(), entries).verify_full();
    assert_eq!(result.first_failure_sequence_id, Some(2));
    assert_eq!(result.failure, Some(IntegrityViolation::ChainHashMismatch));
}

#[test]
fn test_reordering_detected() {
    let ledger = ledger_of(4);
    let mut entries = ledger.entries(..);
    assert!(swap_entries(&mut entries, 3, 4));
    let result = Ledger::from_entries(LedgerConfig::default(), entries).verify_full();
    assert_eq!(result.first_failure_sequence_id, Some(3));
    assert_eq!(result.failure, Some(IntegrityViolation::SequenceGap));
}

#[test]
fn test_removal_detected() {
    let ledger = ledger_of(4);
    let mut entries = ledger.entries(..);
    entries.remove(1);
    let result = Ledger::from_entries(LedgerConfig::default(), entries).verify_full();
    assert_eq!(result.first_failure_sequence_id, Some(2));
}

#[test]
fn test_window_is_relative_to_stored_anchor() {
    let ledger = ledger_of(6);
    let mut entries = ledger.entries(..);
    tamper(&mut entries, 2, TamperField::Payload);
    let forged = Ledger::from_entries(LedgerConfig::default(), entries);

    assert!(forged.verify_window(3, 6).unwrap().valid);
    assert!(forged.verify_recent(4).valid);
    assert_eq!(forged.verify_window(1, 6).unwrap().first_failure_sequence_id, Some(2));
    assert_eq!(forged.verify_full().first_failure_sequence_id, Some(2));

    let summary = forged.summary(4);
    assert!(summary.recent_valid);
    assert!(!summary.full_valid);
}

#[test]
fn test_window_range_errors() {
    let ledger = ledger_of(3);
    for (start, end) in [(0, 1), (2, 1), (1, 4)] {
        let err = ledger.verify_window(start, end).unwrap_err();
        assert!(matches!(
            err,
            kavach_ledger::Error::Ledger(LedgerError::RangeError { len: 3, .. })
        ));
    }
}

#[test]
fn test_reads_are_idempotent() {
    let ledger = ledger_of(5);
    assert_eq!(ledger.entries(2..=3), ledger.entries(2..=3));
    assert_eq!(ledger.entries(2..=3).len(), 2);
    assert_eq!(ledger.entries(4..100).len(), 2);
    assert!(ledger.entries(9..).is_empty());
    assert_eq!(ledger.verify_full(), ledger.verify_full());
    assert_eq!(ledger.latest(), ledger.get(5));
    assert_eq!(ledger.len(), 5);
}

#[test]
fn test_audit_export_roundtrip() {
    let ledger = ledger_of(8);
    let export = ledger.audit_export(3);
    assert_eq!(export.generated_at, "2025-01-01T00:00:00.000000Z");
    assert_eq!(export.length, 8);
    assert_eq!(export.tail.len(), 3);
    assert!(export.full.valid);
    assert!(export.verify_tail().valid);

    let parsed = kavach_ledger::AuditExport::from_json(&export.to_json().unwrap()).unwrap();
    assert_eq!(parsed, export);
}

#[test]
fn test_defaults_from_config() {
    let ledger = ledger_of(60);
    assert_eq!(ledger.summary_default().recent.len(), 25);
    assert_eq!(ledger.audit_export_default().tail.len(), 50);
}

#[test]
fn test_concurrent_appends_and_verifies() {
    let ledger = fixed_ledger();
    let writers: Vec<_> = (0..4)
        .map(|w| {
            let ledger = ledger.clone();
            thread::spawn(move || {
                for i in 0..25 {
                    let mut payload = Payload::new();
                    payload.insert("writer".into(), (w as i64).into());
                    payload.insert("i".into(), (i as i64).into());
                    ledger.append("threat_detected", payload).unwrap();
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..2)
        .map(|_| {
            let ledger = ledger.clone();
            thread::spawn(move || {
                for _ in 0..25 {
                    let result = ledger.verify_full();
                    assert!(result.valid);
                    let _ = ledger.verify_recent(10);
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }

    assert_eq!(ledger.len(), 100);
    let ids: Vec<u64> = ledger.entries(..).iter().map(|e| e.sequence_id).collect();
    assert_eq!(ids, (1..=100).collect::<Vec<_>>());
    assert_eq!(ledger.verify_full(), VerificationResult::ok(100));
}
