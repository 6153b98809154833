//! Session credential storage.
//!
//! The backend issues a short-lived access token and a longer-lived refresh
//! token at login. Both are opaque strings kept in durable storage under
//! fixed keys, alongside a cached copy of the signed-in user's profile:
//!
//! - `access_token`: sent as a bearer header on every authorized request
//! - `refresh_token`: used only to mint a new access token
//! - `user`: cached profile, cleared together with the tokens
//!
//! Storage is behind the [`SessionStore`] trait so the client can be built
//! with an in-memory store in tests and a durable one in production.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Durable storage key for the access token
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Durable storage key for the refresh token
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Durable storage key for the cached user profile
pub const USER_KEY: &str = "user";

/// All keys a session occupies, in purge order
pub const SESSION_KEYS: [&str; 3] = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY];

/// Session file name in the config directory
const SESSION_FILE: &str = "session.json";

/// Cached profile of the signed-in administrator, stored under `user`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

impl SessionUser {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// String-keyed durable session storage.
///
/// Reads are infallible: a backend failure reads as absence, which the
/// client treats as "no credential" rather than an error.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Remove every session entry. Wholesale: tokens and cached user go together.
    fn clear(&self) -> Result<()>;
}

/// In-memory store for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .map_err(|_| anyhow::anyhow!("session store lock poisoned"))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.entries
            .write()
            .map_err(|_| anyhow::anyhow!("session store lock poisoned"))?
            .clear();
        Ok(())
    }
}

/// File-backed store persisting entries as JSON under the config directory.
///
/// Entries are loaded once at open and written through on every set. Clear
/// removes the file entirely.
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStore {
    /// Open the store at `dir/session.json`, loading any existing entries
    pub fn open(dir: PathBuf) -> Result<Self> {
        let path = dir.join(SESSION_FILE);
        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .context("Failed to read session file")?;
            serde_json::from_str(&contents).context("Failed to parse session file")?
        } else {
            HashMap::new()
        };
        debug!(?path, entries = entries.len(), "Session store opened");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, contents).context("Failed to write session file")?;
        Ok(())
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| anyhow::anyhow!("session store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn clear(&self) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| anyhow::anyhow!("session store lock poisoned"))?;
        entries.clear();
        if self.path.exists() {
            std::fs::remove_file(&self.path).context("Failed to remove session file")?;
        }
        Ok(())
    }
}
