//! Record validation error types for the Signet library.

use thiserror::Error as ThisError;

use crate::Error;

/// Errors raised while building or parsing user record fields.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum RecordError {
    /// The email is empty or only whitespace.
    #[error("Email is required")]
    BlankEmail,

    /// A role string other than `admin` or `user`.
    #[error("Invalid role: {value}")]
    InvalidRole {
        /// The rejected value
        value: String,
    },

    /// A status string other than `active` or `inactive`.
    #[error("Invalid status: {value}")]
    InvalidStatus {
        /// The rejected value
        value: String,
    },
}

impl From<RecordError> for Error {
    fn from(err: RecordError) -> Self {
        Error::Record(err)
    }
}
