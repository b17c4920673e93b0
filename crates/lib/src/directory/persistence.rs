//! Persistence for the user directory
//!
//! Saves and loads the directory's records to/from a JSON snapshot. Key
//! material is never part of the snapshot; it lives in the key store.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use super::{DirectoryState, errors::DirectoryError};
use crate::Result;
use crate::record::UserRecord;

/// Snapshot format version. Version 0 is written without a `_v` key.
const SNAPSHOT_VERSION: u8 = 0;

fn is_v0(v: &u8) -> bool {
    *v == 0
}

/// Validates the snapshot version during deserialization.
fn validate_snapshot_version<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let version = u8::deserialize(deserializer)?;
    if version != SNAPSHOT_VERSION {
        return Err(serde::de::Error::custom(DirectoryError::UnsupportedVersion {
            version,
        }));
    }
    Ok(version)
}

/// On-disk form of the directory.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    /// File format version for compatibility checking
    #[serde(
        rename = "_v",
        default,
        skip_serializing_if = "is_v0",
        deserialize_with = "validate_snapshot_version"
    )]
    version: u8,
    next_id: i64,
    users: Vec<UserRecord>,
}

/// Serialize the directory state to a JSON file.
pub(crate) async fn save_to_file(state: &DirectoryState, path: &Path) -> Result<()> {
    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        next_id: state.next_id,
        users: state.users.values().cloned().collect(),
    };
    let json = serde_json::to_string_pretty(&snapshot)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

/// Read directory state from a JSON file.
pub(crate) async fn load_from_file(path: &Path) -> Result<DirectoryState> {
    let json = tokio::fs::read_to_string(path).await?;
    let snapshot: Snapshot = serde_json::from_str(&json)?;

    let mut users: BTreeMap<i64, UserRecord> = BTreeMap::new();
    let mut emails: HashSet<String> = HashSet::new();
    for record in snapshot.users {
        if !emails.insert(record.email.clone()) {
            return Err(DirectoryError::EmailTaken {
                email: record.email,
            }
            .into());
        }
        if users.contains_key(&record.id) {
            return Err(DirectoryError::DuplicateId { id: record.id }.into());
        }
        users.insert(record.id, record);
    }
    // Never hand out an id that is already in use, even if the counter was edited
    let next_id = users
        .keys()
        .next_back()
        .map_or(snapshot.next_id, |max| snapshot.next_id.max(max + 1));

    Ok(DirectoryState { users, next_id })
}
