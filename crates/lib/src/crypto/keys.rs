//! Signing and verifying key types
//!
//! The `PublicKey` and `PrivateKey` enums wrap the algorithm-specific RSA types
//! and carry their PEM encodings: PKCS#8 for private keys, SPKI for public keys.

use rand::rngs::OsRng;
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use zeroize::Zeroizing;

use super::errors::CryptoError;
use crate::constants::RSA_KEY_BITS;

/// Public key used to verify record signatures.
///
/// Safe to distribute; serialized as SPKI PEM.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    /// RSA public key, verified with RSASSA-PKCS1-v1_5 over SHA-256
    Rsa(RsaPublicKey),
}

impl PublicKey {
    /// Verify a signature over the given data.
    ///
    /// Returns `Ok(())` if the signature is valid, or `Err` if verification
    /// fails for any reason (malformed signature, wrong key, etc.).
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        match self {
            PublicKey::Rsa(key) => {
                if signature.len() != key.size() {
                    return Err(CryptoError::InvalidSignature);
                }
                let sig =
                    Signature::try_from(signature).map_err(|_| CryptoError::InvalidSignature)?;
                VerifyingKey::<Sha256>::new(key.clone())
                    .verify(data, &sig)
                    .map_err(|_| CryptoError::InvalidSignature)
            }
        }
    }

    /// Encode the key as SPKI PEM text.
    pub fn to_pem(&self) -> Result<String, CryptoError> {
        match self {
            PublicKey::Rsa(key) => key.to_public_key_pem(LineEnding::LF).map_err(|e| {
                CryptoError::KeyEncodingFailed {
                    reason: e.to_string(),
                }
            }),
        }
    }

    /// Parse a key from SPKI PEM text.
    pub fn from_pem(pem: &str) -> Result<Self, CryptoError> {
        RsaPublicKey::from_public_key_pem(pem.trim())
            .map(PublicKey::Rsa)
            .map_err(|e| CryptoError::InvalidKeyFormat {
                reason: e.to_string(),
            })
    }

    /// Size of signatures produced for this key, in bytes.
    pub fn signature_len(&self) -> usize {
        match self {
            PublicKey::Rsa(key) => key.size(),
        }
    }

    /// Get the algorithm name for this key.
    pub fn algorithm(&self) -> &'static str {
        match self {
            PublicKey::Rsa(_) => "rsa-pkcs1v15-sha256",
        }
    }
}

/// Private key used to sign email fingerprints.
///
/// Never leaves the server process except as the PKCS#8 artifact written by
/// the key store. The inner RSA key zeroizes its secret material on drop.
#[non_exhaustive]
#[derive(Clone)]
pub enum PrivateKey {
    /// RSA private key, signing with RSASSA-PKCS1-v1_5 over SHA-256
    Rsa(RsaPrivateKey),
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrivateKey::Rsa(_) => f.write_str("PrivateKey::Rsa([REDACTED])"),
        }
    }
}

impl PrivateKey {
    /// Generate a new key with [`RSA_KEY_BITS`] of modulus using the OS RNG.
    pub fn generate() -> Result<Self, CryptoError> {
        Self::generate_with_bits(RSA_KEY_BITS)
    }

    /// Generate a new key with an explicit modulus size.
    pub fn generate_with_bits(bits: usize) -> Result<Self, CryptoError> {
        RsaPrivateKey::new(&mut OsRng, bits)
            .map(PrivateKey::Rsa)
            .map_err(|e| CryptoError::KeyGenerationFailed {
                reason: e.to_string(),
            })
    }

    /// Sign the given data and return the raw signature bytes.
    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        match self {
            PrivateKey::Rsa(key) => {
                let signing_key = SigningKey::<Sha256>::new(key.clone());
                let signature: Signature =
                    signing_key
                        .try_sign(data)
                        .map_err(|e| CryptoError::SigningFailed {
                            reason: e.to_string(),
                        })?;
                Ok(signature.to_vec())
            }
        }
    }

    /// Derive the corresponding public key.
    pub fn public_key(&self) -> PublicKey {
        match self {
            PrivateKey::Rsa(key) => PublicKey::Rsa(key.to_public_key()),
        }
    }

    /// Encode the key as PKCS#8 PEM text.
    ///
    /// The returned string is wrapped in [`Zeroizing`] so the key material
    /// is cleared from memory when dropped.
    pub fn to_pem(&self) -> Result<Zeroizing<String>, CryptoError> {
        match self {
            PrivateKey::Rsa(key) => {
                key.to_pkcs8_pem(LineEnding::LF)
                    .map_err(|e| CryptoError::KeyEncodingFailed {
                        reason: e.to_string(),
                    })
            }
        }
    }

    /// Parse a key from PKCS#8 PEM text.
    pub fn from_pem(pem: &str) -> Result<Self, CryptoError> {
        RsaPrivateKey::from_pkcs8_pem(pem.trim())
            .map(PrivateKey::Rsa)
            .map_err(|e| CryptoError::InvalidKeyFormat {
                reason: e.to_string(),
            })
    }

    /// Get the algorithm name for this key.
    pub fn algorithm(&self) -> &'static str {
        match self {
            PrivateKey::Rsa(_) => "rsa-pkcs1v15-sha256",
        }
    }
}
