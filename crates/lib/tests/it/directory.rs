//! Tests for the user directory: signing on create, export, persistence.

use signet::{
    NewUser, Role, Status, UserDirectory, UserUpdate, codec::decode_users, crypto::fingerprint,
    directory::UserFilter, verify_all,
};

use crate::helpers::*;

#[tokio::test]
async fn test_create_signs_with_directory_key() {
    let dir = test_directory();
    let record = dir
        .create(NewUser::new("signed@x.com", Role::Admin).with_status(Status::Inactive))
        .await
        .unwrap();

    assert_eq!(record.email_fingerprint, Some(fingerprint("signed@x.com")));
    let results = verify_all(std::slice::from_ref(&record), test_keystore().public_key());
    assert!(results[0].verified);
}

#[tokio::test]
async fn test_blank_email_rejected() {
    let dir = test_directory();
    let err = dir.create(NewUser::new("", Role::User)).await.unwrap_err();
    assert!(err.is_validation_error());
    assert!(dir.is_empty().await);
}

#[tokio::test]
async fn test_export_contains_every_user_in_id_order() {
    let dir = test_directory();
    for email in distinct_emails(4) {
        dir.create(NewUser::new(email, Role::User)).await.unwrap();
    }
    dir.delete(2).await.unwrap();

    let decoded = decode_users(&dir.export().await.unwrap()).unwrap();
    let ids: Vec<i64> = decoded.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 3, 4]);
    assert_eq!(decoded, dir.list(&UserFilter::default()).await);
}

#[tokio::test]
async fn test_status_update_keeps_record_verifiable() {
    let dir = test_directory();
    let record = dir.create(NewUser::new("u@x.com", Role::User)).await.unwrap();
    dir.update(
        record.id,
        UserUpdate {
            role: Some(Role::Admin),
            status: Some(Status::Inactive),
        },
    )
    .await
    .unwrap();

    let decoded = decode_users(&dir.export().await.unwrap()).unwrap();
    assert_eq!(decoded[0].role, Role::Admin);
    assert!(verify_all(&decoded, test_keystore().public_key())[0].verified);
}

#[tokio::test]
async fn test_reload_under_other_key_still_loads() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("users.json");

    let dir = test_directory();
    dir.create(NewUser::new("a@x.com", Role::User)).await.unwrap();
    dir.save_to_file(&path).await.unwrap();

    let loaded = UserDirectory::load_from_file(&path, other_keystore())
        .await
        .unwrap();
    assert_eq!(loaded.len().await, 1);

    // Export works, but the old seals fail under the new key
    let decoded = decode_users(&loaded.export().await.unwrap()).unwrap();
    assert!(!verify_all(&decoded, other_keystore().public_key())[0].verified);
}

#[tokio::test]
async fn test_missing_snapshot_is_io_error() {
    let tmp = tempfile::tempdir().unwrap();
    let err = UserDirectory::load_from_file(tmp.path().join("absent.json"), test_keystore())
        .await
        .unwrap_err();
    assert!(err.is_io_error());
}

#[tokio::test]
async fn test_concurrent_creates_get_unique_ids() {
    let dir = std::sync::Arc::new(test_directory());
    let mut handles = Vec::new();
    for email in distinct_emails(8) {
        let dir = dir.clone();
        handles.push(tokio::spawn(async move {
            dir.create(NewUser::new(email, Role::User)).await.unwrap().id
        }));
    }
    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort();
    assert_eq!(ids, (1..=8).collect::<Vec<i64>>());
}
