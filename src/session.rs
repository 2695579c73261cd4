//! Per-profile chat identity.
//!
//! A visitor's chat messages are correlated by one opaque token kept in a
//! key-value storage slot (the browser's local storage on the site; a JSON
//! file for the `hub` binary). The token is created on first activation
//! and reused until the storage is cleared. There is no expiry or rotation.
//!
//! [`ChatSession::init_or_load`] is the only way to obtain a session, so the
//! identity is always passed explicitly into the chat widget.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::Utc;
use rand::Rng;
use tracing::{debug, info};

use crate::error::SessionError;

/// Storage key holding the session token.
pub const SESSION_KEY: &str = "chatSessionId";

const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const TOKEN_RANDOM_LEN: usize = 9;

/// A string key-value slot scoped to one visitor profile.
pub trait TokenStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

/// The visitor's chat identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSession {
    token: String,
}

impl ChatSession {
    /// Load the stored token, or create and persist a new one.
    pub fn init_or_load(storage: &dyn TokenStorage) -> Result<Self, SessionError> {
        if let Some(token) = storage.get(SESSION_KEY)? {
            if !token.is_empty() {
                debug!(%token, "reusing chat session");
                return Ok(Self { token });
            }
        }
        let token = generate_token();
        storage.set(SESSION_KEY, &token)?;
        info!(%token, "created chat session");
        Ok(Self { token })
    }

    /// Wrap an existing token without touching storage.
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Forget the stored token; the next `init_or_load` creates a new one.
    pub fn clear(storage: &dyn TokenStorage) -> Result<(), SessionError> {
        storage.remove(SESSION_KEY)
    }
}

/// `session_<unix-millis>_<9 base-36 chars>`.
pub fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..TOKEN_RANDOM_LEN)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect();
    format!("session_{}_{}", Utc::now().timestamp_millis(), suffix)
}

/// Token storage in a JSON object file.
///
/// The file is read on every access and rewritten on every change. A
/// missing file is an empty store.
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, String>, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(HashMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, entries: &HashMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl TokenStorage for FileTokenStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryTokenStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_token_format() {
        let token = generate_token();
        let parts: Vec<&str> = token.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "session");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_init_twice_returns_same_token() {
        let storage = MemoryTokenStorage::new();
        let first = ChatSession::init_or_load(&storage).unwrap();
        let second = ChatSession::init_or_load(&storage).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            storage.get(SESSION_KEY).unwrap().as_deref(),
            Some(first.token())
        );
    }

    #[test]
    fn test_clearing_storage_yields_new_token() {
        let storage = MemoryTokenStorage::new();
        let first = ChatSession::init_or_load(&storage).unwrap();
        ChatSession::clear(&storage).unwrap();
        let second = ChatSession::init_or_load(&storage).unwrap();
        assert_ne!(first.token(), second.token());
    }

    #[test]
    fn test_existing_token_is_reused() {
        let storage = MemoryTokenStorage::new();
        storage.set(SESSION_KEY, "session_1_abcdefghi").unwrap();
        let session = ChatSession::init_or_load(&storage).unwrap();
        assert_eq!(session.token(), "session_1_abcdefghi");
    }

    #[test]
    fn test_file_storage_persists_across_instances() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("session.json");

        let first = ChatSession::init_or_load(&FileTokenStorage::new(&path)).unwrap();
        let second = ChatSession::init_or_load(&FileTokenStorage::new(&path)).unwrap();
        assert_eq!(first, second);

        ChatSession::clear(&FileTokenStorage::new(&path)).unwrap();
        let third = ChatSession::init_or_load(&FileTokenStorage::new(&path)).unwrap();
        assert_ne!(first, third);
    }

    #[test]
    fn test_file_storage_keeps_other_keys() {
        let tmp = TempDir::new().unwrap();
        let storage = FileTokenStorage::new(tmp.path().join("session.json"));
        storage.set("theme", "dark").unwrap();
        ChatSession::init_or_load(&storage).unwrap();
        ChatSession::clear(&storage).unwrap();
        assert_eq!(storage.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();
        let err = ChatSession::init_or_load(&FileTokenStorage::new(&path)).unwrap_err();
        assert!(matches!(err, SessionError::Corrupt(_)));
    }
}
