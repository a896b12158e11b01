//! Secure credential storage: obfuscated file entries (primary) plus the
//! OS keyring (secondary, best-effort).
//!
//! Three fixed entries are kept (access token, refresh token, and the
//! serialized user snapshot) and cleared together on logout. File storage
//! is the primary method since it behaves the same on every platform; the
//! keyring is an additional layer where the OS provides one.

use super::types::{AuthError, User};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use keyring::Entry;
use log::{debug, error, info, warn};
use std::path::PathBuf;

const SERVICE_NAME: &str = "StyleSync";
const ACCESS_TOKEN_KEY: &str = "access_token";
const REFRESH_TOKEN_KEY: &str = "refresh_token";
const USER_DATA_KEY: &str = "user_data";

// Simple obfuscation key - not cryptographically secure but prevents casual
// reading of the token files. Keyring entries get real OS-level encryption.
const OBFUSCATION_KEY: &[u8] = b"StyleSync2026CredentialStore";

struct KeyringEntries {
    access: Entry,
    refresh: Entry,
    user: Entry,
}

impl KeyringEntries {
    fn open() -> Result<Self, keyring::Error> {
        Ok(Self {
            access: Entry::new(SERVICE_NAME, ACCESS_TOKEN_KEY)?,
            refresh: Entry::new(SERVICE_NAME, REFRESH_TOKEN_KEY)?,
            user: Entry::new(SERVICE_NAME, USER_DATA_KEY)?,
        })
    }

    fn entry(&self, key: &str) -> &Entry {
        match key {
            ACCESS_TOKEN_KEY => &self.access,
            REFRESH_TOKEN_KEY => &self.refresh,
            _ => &self.user,
        }
    }
}

/// Secure storage for tokens and the cached user profile.
pub struct SecureStorage {
    data_dir: PathBuf,
    keyring: Option<KeyringEntries>,
}

impl SecureStorage {
    /// Create storage rooted at the platform data directory, with the OS
    /// keyring as a secondary layer when available.
    pub fn new() -> Result<Self, AuthError> {
        let data_dir = dirs::data_local_dir()
            .map(|d| d.join(SERVICE_NAME))
            .ok_or_else(|| AuthError::Storage("Could not determine data directory".to_string()))?;

        std::fs::create_dir_all(&data_dir)
            .map_err(|e| AuthError::Storage(format!("Failed to create data directory: {}", e)))?;

        let keyring = match KeyringEntries::open() {
            Ok(entries) => {
                debug!("Keyring available for service {}", SERVICE_NAME);
                Some(entries)
            }
            Err(e) => {
                warn!("Keyring not available ({}). Using file storage only.", e);
                None
            }
        };

        info!("SecureStorage initialized at {}", data_dir.display());
        Ok(Self { data_dir, keyring })
    }

    /// File-only storage rooted at an explicit directory. Used by tests and
    /// sandboxed hosts that must not touch the user keyring.
    pub fn with_data_dir(data_dir: PathBuf) -> Result<Self, AuthError> {
        std::fs::create_dir_all(&data_dir)
            .map_err(|e| AuthError::Storage(format!("Failed to create data directory: {}", e)))?;
        Ok(Self {
            data_dir,
            keyring: None,
        })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.dat", key))
    }

    /// Simple XOR obfuscation (symmetric; applying it twice restores the input).
    fn obfuscate(data: &[u8]) -> Vec<u8> {
        data.iter()
            .enumerate()
            .map(|(i, &byte)| byte ^ OBFUSCATION_KEY[i % OBFUSCATION_KEY.len()])
            .collect()
    }

    /// Write one entry to file (primary) and keyring (best-effort).
    fn write_entry(&self, key: &str, value: &str) -> Result<(), AuthError> {
        let path = self.entry_path(key);
        let encoded = BASE64.encode(Self::obfuscate(value.as_bytes()));

        std::fs::write(&path, &encoded).map_err(|e| {
            error!("Failed to write {} entry: {}", key, e);
            AuthError::Storage(format!("Failed to write {} entry: {}", key, e))
        })?;
        debug!("Stored {} entry ({} bytes)", key, encoded.len());

        if let Some(keyring) = &self.keyring {
            if let Err(e) = keyring.entry(key).set_password(value) {
                warn!(
                    "Failed to store {} in keyring (file storage still works): {}",
                    key, e
                );
            }
        }

        Ok(())
    }

    /// Read one entry, file first, keyring as fallback. Corrupt file entries
    /// are deleted and treated as absent.
    fn read_entry(&self, key: &str) -> Option<String> {
        let path = self.entry_path(key);

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(encoded) => match BASE64.decode(encoded.trim()) {
                    Ok(obfuscated) => match String::from_utf8(Self::obfuscate(&obfuscated)) {
                        Ok(value) => return Some(value),
                        Err(e) => {
                            error!("Corrupt {} entry (utf8): {}", key, e);
                            let _ = std::fs::remove_file(&path);
                        }
                    },
                    Err(e) => {
                        error!("Corrupt {} entry (base64): {}", key, e);
                        let _ = std::fs::remove_file(&path);
                    }
                },
                Err(e) => {
                    error!("Failed to read {} entry: {}", key, e);
                }
            }
        }

        // Fallback: keyring (migrate back to file storage for next time)
        let keyring = self.keyring.as_ref()?;
        match keyring.entry(key).get_password() {
            Ok(value) => {
                info!("Recovered {} entry from keyring", key);
                let _ = self.write_entry(key, &value);
                Some(value)
            }
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                warn!("Keyring read error for {}: {:?}", key, e);
                None
            }
        }
    }

    /// Remove one entry from both storages. Absent entries are a no-op.
    fn remove_entry(&self, key: &str) -> Result<(), AuthError> {
        let path = self.entry_path(key);
        if path.exists() {
            std::fs::remove_file(&path).map_err(|e| {
                AuthError::Storage(format!("Failed to delete {} entry: {}", key, e))
            })?;
            debug!("Cleared {} entry", key);
        }

        if let Some(keyring) = &self.keyring {
            match keyring.entry(key).delete_credential() {
                Ok(()) => {}
                Err(keyring::Error::NoEntry) => {}
                Err(e) => warn!("Failed to clear {} from keyring: {}", key, e),
            }
        }

        Ok(())
    }

    /// Persist both tokens. Fails if the backing store is unavailable.
    pub fn set_tokens(&self, access_token: &str, refresh_token: &str) -> Result<(), AuthError> {
        self.write_entry(ACCESS_TOKEN_KEY, access_token)?;
        self.write_entry(REFRESH_TOKEN_KEY, refresh_token)?;
        info!("Stored token pair (access: {} chars)", access_token.len());
        Ok(())
    }

    /// The stored access token, or `None` when absent. Never errors for
    /// absence; unreadable entries log and report absent.
    pub fn get_access_token(&self) -> Option<String> {
        self.read_entry(ACCESS_TOKEN_KEY)
    }

    /// The stored refresh token, or `None` when absent.
    pub fn get_refresh_token(&self) -> Option<String> {
        self.read_entry(REFRESH_TOKEN_KEY)
    }

    /// Persist the user snapshot for offline rehydration.
    pub fn set_user_data(&self, user: &User) -> Result<(), AuthError> {
        let json = serde_json::to_string(user)
            .map_err(|e| AuthError::Storage(format!("Failed to serialize user: {}", e)))?;
        self.write_entry(USER_DATA_KEY, &json)
    }

    /// The cached user snapshot. Fails soft: a snapshot that no longer
    /// deserializes is deleted and reported absent.
    pub fn get_user_data(&self) -> Option<User> {
        let json = self.read_entry(USER_DATA_KEY)?;
        match serde_json::from_str(&json) {
            Ok(user) => Some(user),
            Err(e) => {
                error!("Failed to deserialize cached user: {}", e);
                let _ = self.remove_entry(USER_DATA_KEY);
                None
            }
        }
    }

    /// Remove both tokens and the user snapshot. Idempotent: clearing an
    /// empty store is a no-op success. All entries are attempted even if one
    /// fails; the first failure is reported.
    pub fn clear_tokens(&self) -> Result<(), AuthError> {
        let results = [
            self.remove_entry(ACCESS_TOKEN_KEY),
            self.remove_entry(REFRESH_TOKEN_KEY),
            self.remove_entry(USER_DATA_KEY),
        ];

        for result in &results {
            if let Err(e) = result {
                error!("Clear error: {}", e);
            }
        }
        info!("Cleared stored credentials");

        results.into_iter().collect()
    }

    /// Whether a non-empty access token is present. Does not validate expiry
    /// or signature; a stale token still reports authenticated until an API
    /// call comes back unauthorized.
    pub fn is_authenticated(&self) -> bool {
        self.get_access_token().map_or(false, |t| !t.is_empty())
    }
}
