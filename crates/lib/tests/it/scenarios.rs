//! End-to-end flows: create, export, decode, verify.

use signet::{
    NewUser, Outcome, Role,
    codec::{decode_users, encode_users},
    crypto::fingerprint,
    verify_all,
};

use crate::helpers::*;

#[tokio::test]
async fn test_created_user_carries_seal() {
    let dir = test_directory();
    let record = dir
        .create(NewUser::new("a@x.com", Role::User))
        .await
        .unwrap();

    let stored = dir.get(record.id).await.unwrap();
    let stated = stored.email_fingerprint.as_deref().unwrap();
    assert!(!stated.is_empty());
    assert!(!stored.signature.as_deref().unwrap().is_empty());
    assert_eq!(fingerprint("a@x.com"), stated);
}

#[tokio::test]
async fn test_export_two_users_both_verify() {
    let dir = test_directory();
    dir.create(NewUser::new("a@x.com", Role::User)).await.unwrap();
    dir.create(NewUser::new("b@x.com", Role::Admin)).await.unwrap();

    let decoded = decode_users(&dir.export().await.unwrap()).unwrap();
    let results = verify_all(&decoded, test_keystore().public_key());

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.verified));
}

#[tokio::test]
async fn test_edited_email_fails_only_that_record() {
    let dir = test_directory();
    dir.create(NewUser::new("a@x.com", Role::User)).await.unwrap();
    dir.create(NewUser::new("b@x.com", Role::User)).await.unwrap();

    let mut decoded = decode_users(&dir.export().await.unwrap()).unwrap();
    decoded[0].email = "attacker@x.com".to_string();
    let results = verify_all(&decoded, test_keystore().public_key());

    assert!(!results[0].verified);
    assert_eq!(results[0].outcome, Outcome::FingerprintMismatch);
    assert!(results[1].verified);
}

#[test]
fn test_empty_signature_is_unverified() {
    let mut record = signed_record(1, "a@x.com", Role::User);
    record.signature = None;

    let decoded = decode_users(&encode_users(&[record]).unwrap()).unwrap();
    let results = verify_all(&decoded, test_keystore().public_key());

    assert!(!results[0].verified);
    assert_eq!(results[0].outcome, Outcome::MissingSeal);
}

#[test]
fn test_empty_user_list_decodes_to_nothing() {
    let buffer = encode_users(&[]).unwrap();
    assert!(buffer.is_empty());
    assert!(decode_users(&buffer).unwrap().is_empty());
    assert!(verify_all(&[], test_keystore().public_key()).is_empty());
}
