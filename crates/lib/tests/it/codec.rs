//! Tests for the binary export codec against signed records.

use prost::Message;
use signet::{
    NewUser, RecordCodec, Role, Status, UserRecord,
    codec::{CodecError, decode_users, encode_users, proto},
};

use crate::helpers::*;

#[test]
fn test_round_trip_signed_records() {
    let mut records: Vec<UserRecord> = distinct_emails(10)
        .iter()
        .enumerate()
        .map(|(i, email)| signed_record(i as i64, email, Role::User))
        .collect();
    records[3].status = Some(Status::Inactive);
    records[4].role = Role::Admin;
    records[5].status = Some(Status::Active);

    let decoded = decode_users(&encode_users(&records).unwrap()).unwrap();
    assert_eq!(decoded, records);
}

#[tokio::test]
async fn test_directory_records_without_status_round_trip() {
    let dir = test_directory();
    let created = dir
        .create(NewUser::new("plain@x.com", Role::User))
        .await
        .unwrap();
    assert_eq!(created.status, Some(Status::Active));

    let decoded = decode_users(&dir.export().await.unwrap()).unwrap();
    assert_eq!(decoded, vec![created]);
}

#[test]
fn test_wire_field_numbers() {
    let record = signed_record(9, "wire@x.com", Role::Admin);
    let buffer = encode_users(std::slice::from_ref(&record)).unwrap();

    // UserList.users is field 1, length-delimited
    assert_eq!(buffer[0], (1 << 3) | 2);

    let list = proto::UserList::decode(buffer.as_slice()).unwrap();
    let user = &list.users[0];
    assert_eq!(user.id, 9);
    assert_eq!(user.email, "wire@x.com");
    assert_eq!(user.role, "admin");
    assert_eq!(user.status, "active");
    assert_eq!(user.created_at, "2024-01-01T00:00:00Z");
    assert_eq!(Some(user.email_hash.as_str()), record.email_fingerprint.as_deref());
    assert_eq!(Some(user.signature.as_str()), record.signature.as_deref());

    // id is field 1 (varint), email field 2 (length-delimited) inside User
    let inner = user.encode_to_vec();
    assert_eq!(inner[0], 1 << 3);
    assert_eq!(inner[1], 9);
    assert_eq!(inner[2], (2 << 3) | 2);
}

#[test]
fn test_older_buffer_without_optional_fields() {
    // A producer that only knew id, email and role
    let list = proto::UserList {
        users: vec![proto::User {
            id: 12,
            email: "old@x.com".to_string(),
            role: "user".to_string(),
            ..Default::default()
        }],
    };

    let decoded = decode_users(&list.encode_to_vec()).unwrap();
    assert_eq!(decoded.len(), 1);
    let record = &decoded[0];
    assert_eq!(record.id, 12);
    assert_eq!(record.status, None);
    assert_eq!(record.effective_status(), Status::Active);
    assert_eq!(record.created_at, None);
    assert_eq!(record.email_fingerprint, None);
    assert_eq!(record.signature, None);
    assert!(!record.is_sealed());
}

#[test]
fn test_id_zero_survives() {
    let record = UserRecord::unsigned(0, "zero@x.com", Role::User);
    let mut expected = record.clone();
    expected.status = Some(Status::Active);

    let codec = RecordCodec::with_clock(std::sync::Arc::new(signet::FixedClock::default()));
    let decoded = codec.decode(&codec.encode(&[record]).unwrap()).unwrap();
    expected.created_at = decoded[0].created_at;
    assert_eq!(decoded, vec![expected]);
    assert_eq!(decoded[0].id, 0);
}

#[test]
fn test_garbage_is_rejected_whole() {
    let good = encode_users(&[signed_record(1, "a@x.com", Role::User)]).unwrap();

    let mut corrupted = good.clone();
    corrupted.extend_from_slice(&[0x0a, 0xff]);
    assert!(matches!(
        decode_users(&corrupted).unwrap_err(),
        CodecError::Malformed(_)
    ));

    assert!(decode_users(&[0xff, 0xff, 0xff]).unwrap_err().is_decoding_error());
}
