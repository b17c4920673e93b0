//! Directory error types for the Signet library.

use thiserror::Error as ThisError;

use crate::Error;

/// Errors that can occur during user directory operations.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum DirectoryError {
    /// A user with this email already exists.
    #[error("User with email {email} already exists")]
    EmailTaken {
        /// The duplicate email
        email: String,
    },

    /// No user has the requested email.
    #[error("User not found: {email}")]
    EmailNotFound {
        /// The requested email
        email: String,
    },

    /// No user has the requested id.
    #[error("User not found: {id}")]
    UserNotFound {
        /// The requested id
        id: i64,
    },

    /// A snapshot holds more than one record with the same id.
    #[error("Snapshot contains duplicate user id {id}")]
    DuplicateId {
        /// The repeated id
        id: i64,
    },

    /// The snapshot file uses an unsupported format version.
    #[error("Unsupported snapshot version {version}")]
    UnsupportedVersion {
        /// The version found in the file
        version: u8,
    },
}

impl DirectoryError {
    /// Check if this error indicates a user was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DirectoryError::UserNotFound { .. } | DirectoryError::EmailNotFound { .. }
        )
    }

    /// Check if this error indicates a duplicate.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            DirectoryError::EmailTaken { .. } | DirectoryError::DuplicateId { .. }
        )
    }
}

impl From<DirectoryError> for Error {
    fn from(err: DirectoryError) -> Self {
        Error::Directory(err)
    }
}
