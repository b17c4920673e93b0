//! Constants used throughout the Signet library.
//!
//! This module provides central definitions for file names, key sizes and the
//! export content markers shared by the library and the server binary.

/// Modulus size in bits for newly generated signing keys.
pub const RSA_KEY_BITS: usize = 2048;

/// Subdirectory of a data directory that holds the key pair.
pub const KEYS_DIR: &str = "keys";

/// File name of the directory snapshot inside a data directory.
pub const USERS_FILE: &str = "users.json";

/// File name of the PKCS#8 PEM private key inside a key directory.
pub const PRIVATE_KEY_FILE: &str = "private.pem";

/// File name of the SPKI PEM public key inside a key directory.
pub const PUBLIC_KEY_FILE: &str = "public.pem";

/// Content type of the binary user export.
pub const EXPORT_CONTENT_TYPE: &str = "application/x-protobuf";

/// Suggested download name for the binary user export.
pub const EXPORT_FILENAME: &str = "users.pb";

/// Length in hex characters of an email fingerprint (SHA-384).
pub const FINGERPRINT_HEX_LEN: usize = 96;
