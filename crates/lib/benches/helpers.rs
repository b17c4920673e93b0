//! Shared helpers for benchmark tests

use signet::{FixedClock, KeyStore, NewUser, Role, UserRecord};

/// Creates an in-memory key store for benchmarking.
pub fn bench_keystore() -> KeyStore {
    KeyStore::generate().expect("Benchmark key generation failed")
}

/// Creates `count` signed records with distinct emails.
pub fn signed_records(keystore: &KeyStore, count: usize) -> Vec<UserRecord> {
    let clock = FixedClock::default();
    (0..count)
        .map(|i| {
            UserRecord::create(
                i as i64,
                NewUser::new(format!("bench{i}@example.com"), Role::User),
                keystore.private_key(),
                &clock,
            )
            .expect("Failed to create record")
        })
        .collect()
}
