//! Tests for the verification client over decoded exports.

use signet::{
    Outcome, Role,
    codec::{decode_users, encode_users},
    verify::{Summary, verify_all, verify_export},
};

use crate::helpers::*;

#[test]
fn test_results_follow_input_order() {
    let records = vec![
        signed_record(3, "c@x.com", Role::User),
        signed_record(1, "a@x.com", Role::Admin),
        signed_record(2, "b@x.com", Role::User),
    ];
    let results = verify_all(&records, test_keystore().public_key());
    let ids: Vec<i64> = results.iter().map(|r| r.record.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
    assert!(results.iter().all(|r| r.verified));
}

#[test]
fn test_source_records_unchanged() {
    let mut tampered = signed_record(2, "b@x.com", Role::User);
    tampered.email = "eve@x.com".to_string();
    let records = vec![signed_record(1, "a@x.com", Role::User), tampered];
    let before = records.clone();

    let _ = verify_all(&records, test_keystore().public_key());
    assert_eq!(records, before);
}

#[test]
fn test_wrong_public_key_rejects_all() {
    let records = vec![
        signed_record(1, "a@x.com", Role::User),
        signed_record(2, "b@x.com", Role::User),
    ];
    let results = verify_all(&records, other_keystore().public_key());
    assert!(
        results
            .iter()
            .all(|r| !r.verified && r.outcome == Outcome::BadSignature)
    );
}

#[test]
fn test_one_bad_record_does_not_stop_batch() {
    let mut records: Vec<_> = distinct_emails(5)
        .iter()
        .enumerate()
        .map(|(i, e)| signed_record(i as i64, e, Role::User))
        .collect();
    records[0].signature = Some("not hex at all".to_string());

    let results = verify_all(&records, test_keystore().public_key());
    assert_eq!(results[0].outcome, Outcome::BadSignature);
    assert!(results[1..].iter().all(|r| r.verified));

    let summary = Summary::from_results(&results);
    assert_eq!(summary.verified, 4);
    assert_eq!(summary.rejected(), 1);
}

#[test]
fn test_verify_export_with_pem() {
    let keystore = test_keystore();
    let buffer = encode_users(&[signed_record(1, "a@x.com", Role::User)]).unwrap();

    let results = verify_export(&buffer, keystore.public_key_pem()).unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].verified);

    let results = verify_export(&buffer, other_keystore().public_key_pem()).unwrap();
    assert!(!results[0].verified);

    let err = verify_export(&buffer[..buffer.len() - 1], keystore.public_key_pem()).unwrap_err();
    assert!(err.is_decoding_error());
}

#[test]
fn test_stated_fingerprint_tamper_is_mismatch() {
    let mut record = signed_record(1, "a@x.com", Role::User);
    record.email_fingerprint = Some("00".repeat(48));
    let buffer = encode_users(&[record]).unwrap();
    let decoded = decode_users(&buffer).unwrap();

    let results = verify_all(&decoded, test_keystore().public_key());
    assert_eq!(results[0].outcome, Outcome::FingerprintMismatch);
}
