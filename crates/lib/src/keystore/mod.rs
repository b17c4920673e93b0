//! Server signing keypair and its durable storage
//!
//! A [`KeyStore`] is built once during process startup and then shared
//! read-only (usually behind an `Arc`). On [`KeyStore::open`] the directory is
//! checked for `private.pem` (PKCS#8) and `public.pem` (SPKI). When both parse
//! and belong together they are reused; otherwise a fresh keypair is generated
//! and both files are rewritten before the store is returned.

mod errors;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub use errors::KeyStoreError;

use crate::constants::{PRIVATE_KEY_FILE, PUBLIC_KEY_FILE};
use crate::crypto::{PrivateKey, PublicKey};

/// The server's signing keypair.
///
/// Immutable after construction, so it can be shared across request handlers
/// without locking.
pub struct KeyStore {
    /// Directory holding the PEM artifacts, `None` for in-memory stores
    dir: Option<PathBuf>,
    private_key: PrivateKey,
    public_key: PublicKey,
    /// Cached SPKI PEM for the public-key endpoint
    public_key_pem: String,
}

impl KeyStore {
    /// Load the keypair from `dir`, generating and persisting one if needed.
    ///
    /// The directory is created when missing. Read and write failures are
    /// returned as fatal [`KeyStoreError`]s; unparsable or mismatched key
    /// files are replaced.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, KeyStoreError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|source| KeyStoreError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let private_path = dir.join(PRIVATE_KEY_FILE);
        let public_path = dir.join(PUBLIC_KEY_FILE);

        let private_key = match Self::load(&private_path, &public_path)? {
            Some(private_key) => {
                tracing::info!("Loaded existing signing key from {}", dir.display());
                private_key
            }
            None => {
                tracing::info!("Generating new signing key in {}", dir.display());
                let private_key = PrivateKey::generate()?;
                Self::persist(&private_key, &private_path, &public_path)?;
                private_key
            }
        };

        let mut store = Self::from_private_key(private_key)?;
        store.dir = Some(dir.to_path_buf());
        Ok(store)
    }

    /// Create an in-memory store with a freshly generated keypair.
    ///
    /// Nothing is written to disk.
    pub fn generate() -> Result<Self, KeyStoreError> {
        Self::from_private_key(PrivateKey::generate()?)
    }

    /// Create an in-memory store around an existing private key.
    pub fn from_private_key(private_key: PrivateKey) -> Result<Self, KeyStoreError> {
        let public_key = private_key.public_key();
        let public_key_pem = public_key.to_pem()?;
        Ok(Self {
            dir: None,
            private_key,
            public_key,
            public_key_pem,
        })
    }

    /// The private signing key.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// The public verification key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// The public key as SPKI PEM text, as served to clients.
    pub fn public_key_pem(&self) -> &str {
        &self.public_key_pem
    }

    /// The backing directory, if this store is persisted.
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Read both artifacts. `Ok(None)` means they must be regenerated.
    fn load(private_path: &Path, public_path: &Path) -> Result<Option<PrivateKey>, KeyStoreError> {
        if !private_path.exists() || !public_path.exists() {
            return Ok(None);
        }

        let private_pem = zeroize::Zeroizing::new(fs::read_to_string(private_path).map_err(
            |source| KeyStoreError::Read {
                path: private_path.to_path_buf(),
                source,
            },
        )?);
        let public_pem =
            fs::read_to_string(public_path).map_err(|source| KeyStoreError::Read {
                path: public_path.to_path_buf(),
                source,
            })?;

        let private_key = match PrivateKey::from_pem(&private_pem) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!("Discarding unreadable private key: {e}");
                return Ok(None);
            }
        };
        let public_key = match PublicKey::from_pem(&public_pem) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!("Discarding unreadable public key: {e}");
                return Ok(None);
            }
        };

        if private_key.public_key() != public_key {
            tracing::warn!("Stored public key does not match the private key, regenerating");
            return Ok(None);
        }

        Ok(Some(private_key))
    }

    fn persist(
        private_key: &PrivateKey,
        private_path: &Path,
        public_path: &Path,
    ) -> Result<(), KeyStoreError> {
        let private_pem = private_key.to_pem()?;
        let public_pem = private_key.public_key().to_pem()?;

        write_atomic(private_path, private_pem.as_bytes(), true)?;
        write_atomic(public_path, public_pem.as_bytes(), false)?;
        Ok(())
    }
}

impl std::fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyStore")
            .field("dir", &self.dir)
            .field("algorithm", &self.public_key.algorithm())
            .finish_non_exhaustive()
    }
}

/// Write `contents` to a sibling temp file and rename it over `path`.
///
/// Secret files are created owner-only on Unix.
fn write_atomic(path: &Path, contents: &[u8], secret: bool) -> Result<(), KeyStoreError> {
    let write_err = |source| KeyStoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let tmp_path = path.with_extension("pem.tmp");
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    if secret {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    #[cfg(not(unix))]
    let _ = secret;

    let mut file = options.open(&tmp_path).map_err(write_err)?;
    file.write_all(contents).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;
    drop(file);

    fs::rename(&tmp_path, path).map_err(write_err)
}
