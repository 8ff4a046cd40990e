use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use desk_logging::{desk_debug, desk_warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::persist::{remove_if_present, write_atomically, PersistError};

/// Opaque bearer token. Never printed; use [`Credential::fingerprint`] in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// First 8 hex digits of the token's SHA-256.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        digest[..4].iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(fp={})", self.fingerprint())
    }
}

/// Process-wide credential slot. Mutated only by login, logout and failed verification.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Option<Credential>;
    fn store(&self, credential: &Credential) -> Result<(), PersistError>;
    fn clear(&self) -> Result<(), PersistError>;

    /// Presence check only; says nothing about validity.
    fn is_logged_in(&self) -> bool {
        self.load().is_some()
    }
}

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<Credential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: Mutex::new(Some(credential)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Option<Credential> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn store(&self, credential: &Credential) -> Result<(), PersistError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistError> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).take();
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
}

/// Keeps the credential in a small JSON file, replaced atomically on every write.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Option<Credential> {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                desk_warn!("credential: cannot read {:?}: {}", self.path, err);
                return None;
            }
        };

        match serde_json::from_str::<StoredToken>(&content) {
            Ok(stored) if !stored.token.trim().is_empty() => Some(Credential(stored.token)),
            Ok(_) => None,
            Err(err) => {
                desk_warn!("credential: ignoring malformed {:?}: {}", self.path, err);
                None
            }
        }
    }

    fn store(&self, credential: &Credential) -> Result<(), PersistError> {
        let content = serde_json::to_vec(&StoredToken {
            token: credential.expose().to_string(),
        })?;
        write_atomically(&self.path, &content)?;
        desk_debug!(
            "credential: stored fp={} at {:?}",
            credential.fingerprint(),
            self.path
        );
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistError> {
        remove_if_present(&self.path)?;
        desk_debug!("credential: cleared {:?}", self.path);
        Ok(())
    }
}
