//! Fingerprinting and signing of user records
//!
//! A record's integrity stamp is computed in two steps:
//!
//! 1. [`fingerprint`]: SHA-384 over the UTF-8 email text, hex-encoded.
//! 2. [`sign`]: RSASSA-PKCS1-v1_5 with SHA-256 over the fingerprint *text*, hex-encoded.
//!
//! Signing the fingerprint rather than the raw email keeps the signed payload a
//! fixed size. [`verify`] is the inverse check and reports malformed input as a
//! failed verification instead of an error.

mod errors;
mod keys;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha384};

pub use errors::CryptoError;
pub use keys::{PrivateKey, PublicKey};

/// The fingerprint and signature stamped onto a record at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seal {
    /// Hex SHA-384 of the email
    pub fingerprint: String,
    /// Hex signature over `fingerprint`
    pub signature: String,
}

/// Compute the hex-encoded SHA-384 fingerprint of an email address.
///
/// The email is hashed exactly as given; no case folding or trimming.
pub fn fingerprint(email: &str) -> String {
    hex::encode(Sha384::digest(email.as_bytes()))
}

/// Sign a fingerprint with the private key, returning the hex-encoded signature.
pub fn sign(fingerprint: &str, private_key: &PrivateKey) -> Result<String, CryptoError> {
    let signature = private_key.sign(fingerprint.as_bytes())?;
    Ok(hex::encode(signature))
}

/// Check that `signature` was produced over exactly `fingerprint` by the holder
/// of the private key matching `public_key`.
///
/// Returns `false` for any failure: bad hex, wrong length, wrong key, or a
/// signature over different text.
pub fn verify(fingerprint: &str, signature: &str, public_key: &PublicKey) -> bool {
    let Ok(signature_bytes) = hex::decode(signature) else {
        tracing::debug!("Signature is not valid hex");
        return false;
    };
    public_key
        .verify(fingerprint.as_bytes(), &signature_bytes)
        .is_ok()
}

/// Fingerprint an email and sign the fingerprint.
///
/// This is the only place a [`Seal`] is minted; it runs once per record creation.
pub fn hash_and_sign(email: &str, private_key: &PrivateKey) -> Result<Seal, CryptoError> {
    let fingerprint = fingerprint(email);
    let signature = sign(&fingerprint, private_key)?;
    Ok(Seal {
        fingerprint,
        signature,
    })
}
