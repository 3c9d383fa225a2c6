//! Two-scope credential persistence.
//!
//! Tokens and the serialized user profile live in one of two scopes: a
//! durable JSON file that survives process restarts ("remember me") or
//! process memory that vanishes on exit. Reads prefer the durable scope per
//! slot. Every token write records an explicit durability marker so later
//! writers (the refresher) target the same scope instead of guessing.
//!
//! Storage IO never fails callers: errors are logged and the operation
//! degrades to the in-memory state.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use portico_auth::UserProfile;

/// File name of the durable scope inside the store directory.
pub const CREDENTIAL_FILE: &str = "credentials.json";

/// Which scope a credential write lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Durability {
    /// Survives process restarts (file-backed).
    Durable,
    /// Lives for the current process only.
    Ephemeral,
}

/// Token pair as read back from storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredTokens {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl StoredTokens {
    pub fn is_complete(&self) -> bool {
        self.access_token.is_some() && self.refresh_token.is_some()
    }
}

/// The slots one scope persists. The durable scope serializes this to disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CredentialRecord {
    access_token: Option<String>,
    refresh_token: Option<String>,
    user_data: Option<String>,
    durability: Option<Durability>,
}

#[derive(Debug, Default)]
struct StoreInner {
    ephemeral: CredentialRecord,
    /// Scope of the most recent token write in this process.
    active: Option<Durability>,
}

/// Two-scope credential store.
#[derive(Debug)]
pub struct CredentialStore {
    file_path: PathBuf,
    inner: Mutex<StoreInner>,
}

impl CredentialStore {
    /// Store whose durable scope is `dir/credentials.json`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            file_path: dir.as_ref().join(CREDENTIAL_FILE),
            inner: Mutex::new(StoreInner::default()),
        }
    }

    /// Store under the OS config directory (`<config>/portico/`).
    pub fn open_default() -> anyhow::Result<Self> {
        let base = dirs::config_dir()
            .or_else(|| {
                dirs::home_dir().map(|mut home| {
                    home.push(".config");
                    home
                })
            })
            .context("failed to resolve OS config directory")?;
        Ok(Self::new(base.join("portico")))
    }

    /// Write the token pair into exactly one scope.
    ///
    /// The other scope is left untouched; the durability marker is recorded
    /// both in process memory and, for durable writes, beside the pair.
    pub fn store_tokens(&self, access_token: &str, refresh_token: &str, durability: Durability) {
        let mut inner = self.inner.lock().unwrap();
        match durability {
            Durability::Durable => {
                let mut record = self.load_file();
                record.access_token = Some(access_token.to_string());
                record.refresh_token = Some(refresh_token.to_string());
                record.durability = Some(Durability::Durable);
                self.save_file(&record);
            }
            Durability::Ephemeral => {
                inner.ephemeral.access_token = Some(access_token.to_string());
                inner.ephemeral.refresh_token = Some(refresh_token.to_string());
                inner.ephemeral.durability = Some(Durability::Ephemeral);
            }
        }
        inner.active = Some(durability);
    }

    /// Read both tokens, durable scope first per slot.
    pub fn read_tokens(&self) -> StoredTokens {
        let inner = self.inner.lock().unwrap();
        let durable = self.load_file();
        StoredTokens {
            access_token: durable
                .access_token
                .or_else(|| inner.ephemeral.access_token.clone()),
            refresh_token: durable
                .refresh_token
                .or_else(|| inner.ephemeral.refresh_token.clone()),
        }
    }

    /// Persist the user profile snapshot into one scope.
    pub fn store_user(&self, user: &UserProfile, durability: Durability) {
        let serialized = match serde_json::to_string(user) {
            Ok(serialized) => serialized,
            Err(err) => {
                tracing::error!("failed to serialize user profile for storage: {err}");
                return;
            }
        };

        let mut inner = self.inner.lock().unwrap();
        match durability {
            Durability::Durable => {
                let mut record = self.load_file();
                record.user_data = Some(serialized);
                self.save_file(&record);
            }
            Durability::Ephemeral => inner.ephemeral.user_data = Some(serialized),
        }
    }

    /// Read back the stored user profile, if any parses.
    pub fn read_user(&self) -> Option<UserProfile> {
        let inner = self.inner.lock().unwrap();
        let serialized = self
            .load_file()
            .user_data
            .or_else(|| inner.ephemeral.user_data.clone())?;
        drop(inner);

        match serde_json::from_str(&serialized) {
            Ok(user) => Some(user),
            Err(err) => {
                tracing::warn!("stored user profile is unreadable, ignoring it: {err}");
                None
            }
        }
    }

    /// Scope the next token write should target.
    ///
    /// Prefers the marker recorded by the last write in this process. In a
    /// fresh process only durable credentials can have survived, so the
    /// marker persisted beside them decides.
    pub fn active_durability(&self) -> Durability {
        let inner = self.inner.lock().unwrap();
        if let Some(durability) = inner.active {
            return durability;
        }
        drop(inner);

        let record = self.load_file();
        match record.durability {
            Some(durability) if record.access_token.is_some() => durability,
            _ => Durability::Ephemeral,
        }
    }

    /// Remove tokens, user data, and the marker from both scopes.
    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.ephemeral = CredentialRecord::default();
        inner.active = None;
        drop(inner);

        match fs::remove_file(&self.file_path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => tracing::error!("failed to remove credential file: {err}"),
        }
    }

    fn load_file(&self) -> CredentialRecord {
        match self.try_load() {
            Ok(record) => record,
            Err(err) => {
                tracing::debug!("failed to load credential file, treating as empty: {err:?}");
                CredentialRecord::default()
            }
        }
    }

    fn try_load(&self) -> anyhow::Result<CredentialRecord> {
        if !self.file_path.exists() {
            return Ok(CredentialRecord::default());
        }
        let raw = fs::read_to_string(&self.file_path)
            .with_context(|| format!("failed to read credential file at {:?}", self.file_path))?;
        serde_json::from_str(&raw).context("failed to parse credential file")
    }

    fn save_file(&self, record: &CredentialRecord) {
        if let Err(err) = self.try_save(record) {
            tracing::error!("failed to persist credentials: {err:?}");
        }
    }

    fn try_save(&self, record: &CredentialRecord) -> anyhow::Result<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create credential directory at {parent:?}"))?;
        }
        let raw = serde_json::to_string_pretty(record).context("failed to serialize credentials")?;
        fs::write(&self.file_path, raw)
            .with_context(|| format!("failed to write credential file at {:?}", self.file_path))
    }
}
