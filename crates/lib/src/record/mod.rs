//! User record model
//!
//! [`UserRecord`] is the single typed value that flows through signing, export
//! and verification. Fields that may be missing are `Option`s, so a record that
//! was never signed is distinguishable from one carrying an empty signature.

mod errors;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use errors::RecordError;

use crate::Result;
use crate::clock::Clock;
use crate::crypto::{PrivateKey, Seal, hash_and_sign};

/// Access level of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl FromStr for Role {
    type Err = RecordError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(RecordError::InvalidRole {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account status of a user. Records without one are treated as [`Status::Active`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Active,
    Inactive,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Inactive => "inactive",
        }
    }
}

impl FromStr for Status {
    type Err = RecordError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "active" => Ok(Status::Active),
            "inactive" => Ok(Status::Inactive),
            other => Err(RecordError::InvalidStatus {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for creating a user.
///
/// Has no fingerprint or signature fields. Those are derived
/// server-side, and any such keys in a client payload are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub status: Option<Status>,
}

impl NewUser {
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            role,
            status: None,
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }
}

/// Partial update of a user. The email is immutable after creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub status: Option<Status>,
}

/// A user as stored, exported and verified.
///
/// JSON field names follow the HTTP API (`createdAt`, `emailHash`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "emailHash", default, skip_serializing_if = "Option::is_none")]
    pub email_fingerprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl UserRecord {
    /// Create a signed record.
    ///
    /// Stamps `created_at` from `clock`, fills in the default status, and
    /// derives the fingerprint and signature from the email with `private_key`.
    pub fn create(
        id: i64,
        new_user: NewUser,
        private_key: &PrivateKey,
        clock: &dyn Clock,
    ) -> Result<Self> {
        if new_user.email.trim().is_empty() {
            return Err(RecordError::BlankEmail.into());
        }

        let Seal {
            fingerprint,
            signature,
        } = hash_and_sign(&new_user.email, private_key)?;
        tracing::debug!(id, "Signed new user record");

        Ok(Self {
            id,
            email: new_user.email,
            role: new_user.role,
            status: Some(new_user.status.unwrap_or_default()),
            created_at: Some(clock.now_utc()),
            email_fingerprint: Some(fingerprint),
            signature: Some(signature),
        })
    }

    /// Build an unsigned record, as read from a source that never stamped it.
    pub fn unsigned(id: i64, email: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            email: email.into(),
            role,
            status: None,
            created_at: None,
            email_fingerprint: None,
            signature: None,
        }
    }

    /// Apply a role/status update. Fingerprint and signature are left untouched.
    pub fn apply(&mut self, update: UserUpdate) {
        if let Some(role) = update.role {
            self.role = role;
        }
        if let Some(status) = update.status {
            self.status = Some(status);
        }
    }

    /// Status with the default applied.
    pub fn effective_status(&self) -> Status {
        self.status.unwrap_or_default()
    }

    /// Whether both halves of the seal are present and non-empty.
    pub fn is_sealed(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.email_fingerprint) && present(&self.signature)
    }
}
