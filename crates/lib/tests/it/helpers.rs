use std::sync::{Arc, LazyLock};

use signet::{
    FixedClock, KeyStore, NewUser, Role, UserDirectory, UserRecord, crypto::PrivateKey,
};

// ==========================
// SHARED KEY MATERIAL
// ==========================
// RSA key generation dominates test time, so every test that does not exercise
// key generation itself shares these two stores.

static PRIMARY: LazyLock<Arc<KeyStore>> =
    LazyLock::new(|| Arc::new(KeyStore::generate().expect("Failed to generate primary keys")));

static SECONDARY: LazyLock<Arc<KeyStore>> =
    LazyLock::new(|| Arc::new(KeyStore::generate().expect("Failed to generate secondary keys")));

/// The key store most tests sign with.
pub fn test_keystore() -> Arc<KeyStore> {
    PRIMARY.clone()
}

/// An unrelated key store, for wrong-key checks.
pub fn other_keystore() -> Arc<KeyStore> {
    SECONDARY.clone()
}

pub fn test_private_key() -> &'static PrivateKey {
    PRIMARY.private_key()
}

/// A directory signing with the shared key and a pinned clock.
pub fn test_directory() -> UserDirectory {
    UserDirectory::with_clock(test_keystore(), Arc::new(FixedClock::default()))
}

/// A signed record for `email`.
pub fn signed_record(id: i64, email: &str, role: Role) -> UserRecord {
    UserRecord::create(
        id,
        NewUser::new(email, role),
        test_private_key(),
        &FixedClock::default(),
    )
    .expect("Failed to create signed record")
}

/// `count` distinct email addresses.
pub fn distinct_emails(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("user{i}@example.com")).collect()
}
