//!
//! Signet: signed user-record export.
//! This library provides the integrity core of a user-admin service: every user record is
//! stamped at creation with a fingerprint of its email and a signature from a server-held key,
//! the full record set can be exported in a compact binary form, and any consumer holding the
//! public key can re-check each record offline.
//!
//! ## Core Concepts
//!
//! * **KeyStore (`keystore::KeyStore`)**: Owns the server's RSA signing keypair and its durable PEM artifacts.
//! * **Fingerprints and signatures (`crypto`)**: SHA-384 digest of an email, signed with RSASSA-PKCS1-v1_5/SHA-256.
//! * **User records (`record::UserRecord`)**: The strongly-typed record carrying the fingerprint and signature.
//! * **RecordCodec (`codec::RecordCodec`)**: Protobuf-compatible `UserList` export and import.
//! * **Verification (`verify`)**: Independent, two-stage re-verification of decoded records.
//! * **UserDirectory (`directory::UserDirectory`)**: A small in-process record store that signs on create and exports.

pub mod clock;
pub mod codec;
pub mod constants;
pub mod crypto;
pub mod directory;
pub mod keystore;
pub mod record;
pub mod verify;

pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "testing"))]
pub use clock::FixedClock;
pub use codec::RecordCodec;
pub use directory::UserDirectory;
pub use keystore::KeyStore;
pub use record::{NewUser, Role, Status, UserRecord, UserUpdate};
pub use verify::{Outcome, VerificationResult, verify_all};

/// Result type used throughout the Signet library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Signet library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured key store errors from the keystore module
    #[error(transparent)]
    KeyStore(keystore::KeyStoreError),

    /// Structured cryptographic errors from the crypto module
    #[error(transparent)]
    Crypto(crypto::CryptoError),

    /// Structured record validation errors from the record module
    #[error(transparent)]
    Record(record::RecordError),

    /// Structured encode/decode errors from the codec module
    #[error(transparent)]
    Codec(codec::CodecError),

    /// Structured directory errors from the directory module
    #[error(transparent)]
    Directory(directory::DirectoryError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::KeyStore(_) => "keystore",
            Error::Crypto(_) => "crypto",
            Error::Record(_) => "record",
            Error::Codec(_) => "codec",
            Error::Directory(_) => "directory",
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Directory(dir_err) => dir_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error indicates a conflict (already exists).
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::Directory(dir_err) => dir_err.is_conflict(),
            _ => false,
        }
    }

    /// Check if this error must abort process startup.
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::KeyStore(ks_err) => ks_err.is_fatal(),
            _ => false,
        }
    }

    /// Check if this error was caused by invalid caller input.
    pub fn is_validation_error(&self) -> bool {
        match self {
            Error::Record(_) => true,
            Error::Codec(codec_err) => codec_err.is_encoding_error(),
            _ => false,
        }
    }

    /// Check if this error is an encode or decode failure.
    pub fn is_codec_error(&self) -> bool {
        matches!(self, Error::Codec(_))
    }

    /// Check if this error is a decode failure (malformed or truncated buffer).
    pub fn is_decoding_error(&self) -> bool {
        match self {
            Error::Codec(codec_err) => codec_err.is_decoding_error(),
            _ => false,
        }
    }

    /// Check if this error is related to key material.
    pub fn is_key_error(&self) -> bool {
        match self {
            Error::KeyStore(_) => true,
            Error::Crypto(crypto_err) => crypto_err.is_key_error(),
            _ => false,
        }
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        match self {
            Error::Io(_) => true,
            Error::KeyStore(ks_err) => ks_err.is_io_error(),
            _ => false,
        }
    }
}
