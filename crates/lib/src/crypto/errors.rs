//! Cryptographic error types for the Signet library.

use thiserror::Error as ThisError;

use crate::Error;

/// Errors that can occur while handling key material or producing signatures.
///
/// Verification of a signature never produces one of these: a signature that
/// fails to check is reported as `false` by [`super::verify`].
#[non_exhaustive]
#[derive(Debug, ThisError)]
pub enum CryptoError {
    /// Key text could not be parsed as the expected PEM structure.
    #[error("Invalid key format: {reason}")]
    InvalidKeyFormat {
        /// Description of why the key format is invalid
        reason: String,
    },

    /// Key material could not be serialized to PEM.
    #[error("Key encoding failed: {reason}")]
    KeyEncodingFailed {
        /// Description of the encoding failure
        reason: String,
    },

    /// The RNG or the RSA prime search failed.
    #[error("Key generation failed: {reason}")]
    KeyGenerationFailed {
        /// Description of the generation failure
        reason: String,
    },

    /// The private key operation failed.
    #[error("Signing failed: {reason}")]
    SigningFailed {
        /// Description of the signing failure
        reason: String,
    },

    /// Signature bytes did not verify under the given public key.
    #[error("Invalid signature")]
    InvalidSignature,
}

impl CryptoError {
    /// Check if this error is about key material rather than a signature.
    pub fn is_key_error(&self) -> bool {
        matches!(
            self,
            CryptoError::InvalidKeyFormat { .. }
                | CryptoError::KeyEncodingFailed { .. }
                | CryptoError::KeyGenerationFailed { .. }
        )
    }

    /// Check if this error indicates an invalid signature.
    pub fn is_invalid_signature(&self) -> bool {
        matches!(self, CryptoError::InvalidSignature)
    }
}

impl From<CryptoError> for Error {
    fn from(err: CryptoError) -> Self {
        Error::Crypto(err)
    }
}
