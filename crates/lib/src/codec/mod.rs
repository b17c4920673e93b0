//! Binary export codec
//!
//! Serializes user records into a protobuf `UserList` (see `proto/user.proto`)
//! and back. Encoding validates every record before writing any bytes; decoding
//! rejects the whole buffer on the first structural or field-level problem.
//!
//! Wire defaults for absent fields:
//!
//! | field       | encoded when absent       | decoded from empty |
//! |-------------|---------------------------|--------------------|
//! | `status`    | `"active"`                | `None`             |
//! | `createdAt` | codec clock's current time| `None`             |
//! | `emailHash` | `""`                      | `None`             |
//! | `signature` | `""`                      | `None`             |
//!
//! `createdAt` keeps the instant, not the text. Timestamps from other producers
//! are converted to UTC and re-written with the shortest lossless fraction, so
//! `2024-01-01T00:00:00.000Z` comes back as `2024-01-01T00:00:00Z` and
//! `2024-01-01T02:00:00+02:00` as `2024-01-01T00:00:00Z`.

mod errors;
pub mod proto;

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use prost::Message;

pub use errors::CodecError;

use crate::clock::{Clock, SystemClock};
use crate::record::{Role, Status, UserRecord};

/// Encoder/decoder for the binary user export.
#[derive(Debug, Clone)]
pub struct RecordCodec {
    clock: Arc<dyn Clock>,
}

impl Default for RecordCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordCodec {
    /// Create a codec that stamps missing timestamps with system time.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a codec with a specific time source.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Encode records into a `UserList` buffer.
    ///
    /// Fails without producing output if any record is invalid: a negative or
    /// out-of-range id, a blank email, or a present-but-empty fingerprint or
    /// signature.
    pub fn encode(&self, records: &[UserRecord]) -> Result<Vec<u8>, CodecError> {
        let now = self.clock.now_utc();
        let users = records
            .iter()
            .enumerate()
            .map(|(index, record)| to_wire(index, record, now))
            .collect::<Result<Vec<_>, _>>()?;

        let buffer = proto::UserList { users }.encode_to_vec();
        tracing::debug!(records = records.len(), bytes = buffer.len(), "Encoded user export");
        Ok(buffer)
    }

    /// Decode a `UserList` buffer into records.
    ///
    /// An empty buffer is a valid, empty list.
    pub fn decode(&self, buffer: &[u8]) -> Result<Vec<UserRecord>, CodecError> {
        let list = proto::UserList::decode(buffer)?;
        list.users
            .into_iter()
            .enumerate()
            .map(|(index, user)| from_wire(index, user))
            .collect()
    }
}

/// Encode with a system-time codec.
pub fn encode_users(records: &[UserRecord]) -> Result<Vec<u8>, CodecError> {
    RecordCodec::new().encode(records)
}

/// Decode with a default codec.
pub fn decode_users(buffer: &[u8]) -> Result<Vec<UserRecord>, CodecError> {
    RecordCodec::new().decode(buffer)
}

/// Format a timestamp the way it is written to the wire.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn to_wire(index: usize, record: &UserRecord, now: DateTime<Utc>) -> Result<proto::User, CodecError> {
    let invalid = |reason: &str| CodecError::InvalidRecord {
        index,
        id: record.id,
        reason: reason.to_string(),
    };

    let id = i32::try_from(record.id).map_err(|_| invalid("id does not fit in int32"))?;
    if id < 0 {
        return Err(invalid("id must not be negative"));
    }
    if record.email.trim().is_empty() {
        return Err(invalid("email is required"));
    }
    if record.email_fingerprint.as_deref() == Some("") {
        return Err(invalid("emailHash is present but empty"));
    }
    if record.signature.as_deref() == Some("") {
        return Err(invalid("signature is present but empty"));
    }

    Ok(proto::User {
        id,
        email: record.email.clone(),
        role: record.role.as_str().to_string(),
        status: record.effective_status().as_str().to_string(),
        created_at: format_timestamp(&record.created_at.unwrap_or(now)),
        email_hash: record.email_fingerprint.clone().unwrap_or_default(),
        signature: record.signature.clone().unwrap_or_default(),
    })
}

fn from_wire(index: usize, user: proto::User) -> Result<UserRecord, CodecError> {
    let invalid = |field: &'static str, reason: String| CodecError::InvalidField {
        index,
        field,
        reason,
    };

    if user.id < 0 {
        return Err(invalid("id", format!("negative id {}", user.id)));
    }
    let role = user
        .role
        .parse::<Role>()
        .map_err(|e| invalid("role", e.to_string()))?;
    let status = non_empty(user.status)
        .map(|s| s.parse::<Status>())
        .transpose()
        .map_err(|e| invalid("status", e.to_string()))?;
    let created_at = non_empty(user.created_at)
        .map(|s| DateTime::parse_from_rfc3339(&s).map(|ts| ts.with_timezone(&Utc)))
        .transpose()
        .map_err(|e| invalid("createdAt", e.to_string()))?;

    Ok(UserRecord {
        id: i64::from(user.id),
        email: user.email,
        role,
        status,
        created_at,
        email_fingerprint: non_empty(user.email_hash),
        signature: non_empty(user.signature),
    })
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}
