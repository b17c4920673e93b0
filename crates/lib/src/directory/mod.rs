//! In-process user directory
//!
//! [`UserDirectory`] is the signing path for new users and the source of the
//! binary export. It keeps records in memory, ordered by id, and can save and
//! load a JSON snapshot of them.

mod errors;
mod persistence;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::RwLock;

pub use errors::DirectoryError;

use crate::Result;
use crate::clock::{Clock, SystemClock};
use crate::codec::RecordCodec;
use crate::keystore::KeyStore;
use crate::record::{NewUser, Role, Status, UserRecord, UserUpdate};
use crate::verify::verify_all;

/// Optional filters for [`UserDirectory::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserFilter {
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub status: Option<Status>,
}

impl UserFilter {
    fn matches(&self, record: &UserRecord) -> bool {
        self.role.is_none_or(|role| record.role == role)
            && self.status.is_none_or(|status| record.effective_status() == status)
    }
}

#[derive(Debug)]
pub(crate) struct DirectoryState {
    pub(crate) users: BTreeMap<i64, UserRecord>,
    pub(crate) next_id: i64,
}

impl Default for DirectoryState {
    fn default() -> Self {
        Self {
            users: BTreeMap::new(),
            next_id: 1,
        }
    }
}

/// Signed user records held in memory.
#[derive(Debug)]
pub struct UserDirectory {
    keystore: Arc<KeyStore>,
    clock: Arc<dyn Clock>,
    codec: RecordCodec,
    state: RwLock<DirectoryState>,
}

impl UserDirectory {
    /// Create an empty directory that signs with `keystore`.
    pub fn new(keystore: Arc<KeyStore>) -> Self {
        Self::with_clock(keystore, Arc::new(SystemClock))
    }

    /// Create an empty directory with a specific time source.
    pub fn with_clock(keystore: Arc<KeyStore>, clock: Arc<dyn Clock>) -> Self {
        Self::from_state(keystore, clock, DirectoryState::default())
    }

    fn from_state(keystore: Arc<KeyStore>, clock: Arc<dyn Clock>, state: DirectoryState) -> Self {
        Self {
            keystore,
            codec: RecordCodec::with_clock(clock.clone()),
            clock,
            state: RwLock::new(state),
        }
    }

    /// Load a directory from a JSON snapshot.
    ///
    /// Records that no longer verify under `keystore` (for example after the
    /// key files were replaced) are kept but logged. A snapshot with duplicate
    /// ids or emails is rejected.
    pub async fn load_from_file(path: impl AsRef<Path>, keystore: Arc<KeyStore>) -> Result<Self> {
        Self::load_from_file_with_clock(path, keystore, Arc::new(SystemClock)).await
    }

    /// Load a directory from a JSON snapshot with a specific time source.
    pub async fn load_from_file_with_clock(
        path: impl AsRef<Path>,
        keystore: Arc<KeyStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let state = persistence::load_from_file(path.as_ref()).await?;

        let records: Vec<UserRecord> = state.users.values().cloned().collect();
        let rejected = verify_all(&records, keystore.public_key())
            .iter()
            .filter(|r| !r.verified)
            .count();
        if rejected > 0 {
            tracing::warn!(
                rejected,
                "Loaded {} users, some do not verify under the current key",
                records.len()
            );
        } else {
            tracing::info!("Loaded {} users from {}", records.len(), path.as_ref().display());
        }

        Ok(Self::from_state(keystore, clock, state))
    }

    /// Save every record to a JSON snapshot.
    pub async fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let state = self.state.read().await;
        persistence::save_to_file(&state, path.as_ref()).await
    }

    /// Create and sign a new user.
    ///
    /// Fails with [`DirectoryError::EmailTaken`] if the email is already used.
    pub async fn create(&self, new_user: NewUser) -> Result<UserRecord> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.email == new_user.email) {
            return Err(DirectoryError::EmailTaken {
                email: new_user.email,
            }
            .into());
        }

        let id = state.next_id;
        let record = UserRecord::create(
            id,
            new_user,
            self.keystore.private_key(),
            self.clock.as_ref(),
        )?;
        state.users.insert(id, record.clone());
        state.next_id += 1;
        tracing::info!(id, role = %record.role, "Created user");
        Ok(record)
    }

    /// List users matching `filter`, in id order.
    pub async fn list(&self, filter: &UserFilter) -> Vec<UserRecord> {
        self.state
            .read()
            .await
            .users
            .values()
            .filter(|u| filter.matches(u))
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: i64) -> Result<UserRecord> {
        self.state
            .read()
            .await
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| DirectoryError::UserNotFound { id }.into())
    }

    pub async fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        self.state
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
    }

    /// Change a user's role and/or status. The seal is not re-derived.
    pub async fn update(&self, id: i64, update: UserUpdate) -> Result<UserRecord> {
        let mut state = self.state.write().await;
        let record = state
            .users
            .get_mut(&id)
            .ok_or(DirectoryError::UserNotFound { id })?;
        record.apply(update);
        Ok(record.clone())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.state
            .write()
            .await
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DirectoryError::UserNotFound { id }.into())
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Encode every user into the binary export format.
    pub async fn export(&self) -> Result<Vec<u8>> {
        let records = self.list(&UserFilter::default()).await;
        Ok(self.codec.encode(&records)?)
    }

    /// The key store used for signing.
    pub fn keystore(&self) -> &Arc<KeyStore> {
        &self.keystore
    }
}
