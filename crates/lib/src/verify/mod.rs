//! Offline verification of exported user records
//!
//! A consumer holding only the export buffer and the server's public key can
//! decide which records to trust. Each record goes through two stages:
//!
//! 1. Recompute the fingerprint from the email and compare it with the stated
//!    one. A mismatch means the email or fingerprint changed after signing.
//! 2. Only if the fingerprints agree, check the signature over the fingerprint.
//!    A failure here means the signature was not made by the server's key.
//!
//! Records without a fingerprint or signature fail without any cryptographic
//! work. None of these outcomes is an error, and one bad record never stops
//! the rest of the batch from being checked.

use serde::Serialize;

use crate::Result;
use crate::codec::RecordCodec;
use crate::crypto::{PublicKey, fingerprint, verify};
use crate::record::UserRecord;

/// How a record fared in verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Fingerprint matches the email and the signature checks out
    Verified,
    /// Fingerprint or signature is absent or empty
    MissingSeal,
    /// The stated fingerprint is not the digest of the email
    FingerprintMismatch,
    /// The signature does not verify under the public key
    BadSignature,
}

impl Outcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, Outcome::Verified)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Verified => "verified",
            Outcome::MissingSeal => "missing_seal",
            Outcome::FingerprintMismatch => "fingerprint_mismatch",
            Outcome::BadSignature => "bad_signature",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-record verification result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    pub record: UserRecord,
    /// `true` exactly when `outcome` is [`Outcome::Verified`]
    pub verified: bool,
    pub outcome: Outcome,
}

/// Classify a single record.
pub fn verify_record(record: &UserRecord, public_key: &PublicKey) -> Outcome {
    let (Some(stated), Some(signature)) = (
        record.email_fingerprint.as_deref().filter(|s| !s.is_empty()),
        record.signature.as_deref().filter(|s| !s.is_empty()),
    ) else {
        return Outcome::MissingSeal;
    };

    if fingerprint(&record.email) != stated {
        return Outcome::FingerprintMismatch;
    }

    if verify(stated, signature, public_key) {
        Outcome::Verified
    } else {
        Outcome::BadSignature
    }
}

/// Verify every record against `public_key`.
///
/// Results are returned in input order; `records` is not modified.
pub fn verify_all(records: &[UserRecord], public_key: &PublicKey) -> Vec<VerificationResult> {
    records
        .iter()
        .map(|record| {
            let outcome = verify_record(record, public_key);
            if !outcome.is_verified() {
                tracing::warn!(id = record.id, %outcome, "User record failed verification");
            }
            VerificationResult {
                record: record.clone(),
                verified: outcome.is_verified(),
                outcome,
            }
        })
        .collect()
}

/// Decode an export buffer and verify it against a PEM public key.
///
/// Fails only if the key or the buffer cannot be parsed.
pub fn verify_export(buffer: &[u8], public_key_pem: &str) -> Result<Vec<VerificationResult>> {
    let public_key = PublicKey::from_pem(public_key_pem)?;
    let records = RecordCodec::new().decode(buffer)?;
    Ok(verify_all(&records, &public_key))
}

/// Counts of verification outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub verified: usize,
    pub missing_seal: usize,
    pub fingerprint_mismatch: usize,
    pub bad_signature: usize,
}

impl Summary {
    pub fn from_results(results: &[VerificationResult]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Self::default()
        };
        for result in results {
            match result.outcome {
                Outcome::Verified => summary.verified += 1,
                Outcome::MissingSeal => summary.missing_seal += 1,
                Outcome::FingerprintMismatch => summary.fingerprint_mismatch += 1,
                Outcome::BadSignature => summary.bad_signature += 1,
            }
        }
        summary
    }

    /// Number of records that must not be trusted.
    pub fn rejected(&self) -> usize {
        self.total - self.verified
    }

    pub fn all_verified(&self) -> bool {
        self.rejected() == 0
    }
}
