//! Codec error types for the Signet library.

use thiserror::Error as ThisError;

use crate::Error;

/// Errors produced while encoding or decoding a user export.
///
/// Both directions are all-or-nothing: an error means no buffer was produced
/// (encode) or no records were returned (decode).
#[non_exhaustive]
#[derive(Debug, ThisError)]
pub enum CodecError {
    /// A record failed validation before encoding.
    #[error("Cannot encode record {index} (id {id}): {reason}")]
    InvalidRecord {
        /// Position of the record in the input slice
        index: usize,
        /// The record's id
        id: i64,
        /// Description of the validation failure
        reason: String,
    },

    /// The buffer is not a well-formed `UserList`.
    #[error("Malformed export buffer: {0}")]
    Malformed(#[from] prost::DecodeError),

    /// The buffer parsed, but a field holds a value no record can have.
    #[error("Invalid {field} in exported user {index}: {reason}")]
    InvalidField {
        /// Position of the user in the buffer
        index: usize,
        /// Wire name of the offending field
        field: &'static str,
        /// Description of the problem
        reason: String,
    },
}

impl CodecError {
    /// Check if this error came from `encode`.
    pub fn is_encoding_error(&self) -> bool {
        matches!(self, CodecError::InvalidRecord { .. })
    }

    /// Check if this error came from `decode`.
    pub fn is_decoding_error(&self) -> bool {
        matches!(
            self,
            CodecError::Malformed(_) | CodecError::InvalidField { .. }
        )
    }
}

impl From<CodecError> for Error {
    fn from(err: CodecError) -> Self {
        Error::Codec(err)
    }
}
