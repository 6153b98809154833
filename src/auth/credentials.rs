//! OS keychain-backed session storage.
//!
//! Stores each session entry as a separate keychain credential under a fixed
//! service name. Preferred over the file store on workstations where a
//! keychain is available, since tokens never touch disk in plaintext.

use anyhow::{Context, Result};
use keyring::Entry;

use super::session::{SessionStore, SESSION_KEYS};

const SERVICE_NAME: &str = "workhub-console";

pub struct KeyringStore;

impl KeyringStore {
    pub fn new() -> Self {
        Self
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for KeyringStore {
    fn get(&self, key: &str) -> Option<String> {
        let entry = Entry::new(SERVICE_NAME, key).ok()?;
        entry.get_password().ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, key)
            .context("Failed to create keyring entry")?;
        entry
            .set_password(value)
            .context("Failed to store session entry in keychain")?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        for key in SESSION_KEYS {
            if let Ok(entry) = Entry::new(SERVICE_NAME, key) {
                // A key that was never written is not an error during purge
                match entry.delete_credential() {
                    Ok(()) | Err(keyring::Error::NoEntry) => {}
                    Err(e) => {
                        return Err(e).context("Failed to delete session entry from keychain")
                    }
                }
            }
        }
        Ok(())
    }
}
