//! Key store error types for the Signet library.

use std::path::PathBuf;

use thiserror::Error as ThisError;

use crate::Error;
use crate::crypto::CryptoError;

/// Errors that can occur while opening the key store.
///
/// Every variant is fatal: the service cannot sign records without a durable
/// keypair, so callers should abort startup rather than retry.
#[non_exhaustive]
#[derive(Debug, ThisError)]
pub enum KeyStoreError {
    /// The key directory could not be created.
    #[error("Failed to create key directory {path}")]
    CreateDir {
        /// The directory that could not be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A key artifact exists but could not be read.
    #[error("Failed to read key file {path}")]
    Read {
        /// The file that could not be read
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A key artifact could not be written.
    #[error("Failed to write key file {path}")]
    Write {
        /// The file that could not be written
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Generating or encoding key material failed.
    #[error("Key material error: {0}")]
    Key(#[from] CryptoError),
}

impl KeyStoreError {
    /// Check if this error must abort startup. Always true.
    pub fn is_fatal(&self) -> bool {
        true
    }

    /// Check if this error came from the filesystem.
    pub fn is_io_error(&self) -> bool {
        matches!(
            self,
            KeyStoreError::CreateDir { .. }
                | KeyStoreError::Read { .. }
                | KeyStoreError::Write { .. }
        )
    }

    /// Get the path involved, if this is a filesystem error.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            KeyStoreError::CreateDir { path, .. }
            | KeyStoreError::Read { path, .. }
            | KeyStoreError::Write { path, .. } => Some(path),
            KeyStoreError::Key(_) => None,
        }
    }
}

impl From<KeyStoreError> for Error {
    fn from(err: KeyStoreError) -> Self {
        Error::KeyStore(err)
    }
}
