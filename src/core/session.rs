// src/core/session.rs
//! Client-side session persistence behind a single accessor

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::app_log;
use crate::error::ClientError;
use crate::types::{Session, User};

/// Keys of the persisted key/value state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StorageKey {
    Token,
    User,
    RememberedEmail,
}

impl StorageKey {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::Token => "token",
            StorageKey::User => "user",
            StorageKey::RememberedEmail => "rememberedEmail",
        }
    }
}

/// Synchronous key/value storage, scoped to one client installation.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: StorageKey) -> Result<Option<String>, ClientError>;
    fn set(&self, key: StorageKey, value: &str) -> Result<(), ClientError>;
    fn remove(&self, key: StorageKey) -> Result<(), ClientError>;
}

fn poisoned() -> ClientError {
    ClientError::Storage("session store lock poisoned".to_string())
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RwLock<BTreeMap<StorageKey, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: StorageKey) -> Result<Option<String>, ClientError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(&key).cloned())
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<(), ClientError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<(), ClientError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.remove(&key);
        Ok(())
    }
}

/// Stores every key in one JSON object file, rewritten on each change.
/// The directory is created 0700 and the file written 0600 on Unix.
pub struct FileSessionStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, ClientError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| {
            ClientError::Storage(format!("read {}: {}", self.path.display(), e))
        })?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            ClientError::Storage(format!("parse {}: {}", self.path.display(), e))
        })
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                ClientError::Storage(format!("mkdir {}: {}", parent.display(), e))
            })?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                    app_log!(warn, "failed to chmod 0700 {}: {}", parent.display(), e);
                }
            }
        }

        let content = serde_json::to_string_pretty(map)
            .map_err(|e| ClientError::Storage(format!("serialize session: {}", e)))?;
        fs::write(&self.path, content).map_err(|e| {
            ClientError::Storage(format!("write {}: {}", self.path.display(), e))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600)).map_err(|e| {
                ClientError::Storage(format!("chmod {}: {}", self.path.display(), e))
            })?;
        }

        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: StorageKey) -> Result<Option<String>, ClientError> {
        let _guard = self.lock.read().map_err(|_| poisoned())?;
        Ok(self.read_map()?.remove(key.as_str()))
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<(), ClientError> {
        let _guard = self.lock.write().map_err(|_| poisoned())?;
        let mut map = self.read_map()?;
        map.insert(key.as_str().to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove(&self, key: StorageKey) -> Result<(), ClientError> {
        let _guard = self.lock.write().map_err(|_| poisoned())?;
        let mut map = self.read_map()?;
        if map.remove(key.as_str()).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

/// Shared handle every component reads and writes the session through.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
}

impl SessionContext {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    pub fn token(&self) -> Result<Option<String>, ClientError> {
        Ok(self
            .store
            .get(StorageKey::Token)?
            .filter(|t| !t.is_empty()))
    }

    /// Stored session, if a token is present. A missing or unreadable user record
    /// yields an empty user rather than dropping the token.
    pub fn session(&self) -> Result<Option<Session>, ClientError> {
        let Some(token) = self.token()? else {
            return Ok(None);
        };
        let user = match self.store.get(StorageKey::User)? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                app_log!(warn, "stored user record is unreadable: {}", e);
                User::default()
            }),
            None => User::default(),
        };
        Ok(Some(Session { token, user }))
    }

    pub fn save(&self, session: &Session) -> Result<(), ClientError> {
        let user = serde_json::to_string(&session.user)
            .map_err(|e| ClientError::Storage(format!("serialize user: {}", e)))?;
        self.store.set(StorageKey::Token, &session.token)?;
        self.store.set(StorageKey::User, &user)?;
        app_log!(info, "session saved for {}", session.user.email);
        Ok(())
    }

    /// Drop token and user. The remembered login email is kept.
    pub fn clear(&self) -> Result<(), ClientError> {
        self.store.remove(StorageKey::Token)?;
        self.store.remove(StorageKey::User)?;
        app_log!(info, "session cleared");
        Ok(())
    }

    /// Merge name and email into the stored user; the token is untouched.
    pub fn update_user(&self, name: &str, email: &str) -> Result<Option<User>, ClientError> {
        let Some(mut session) = self.session()? else {
            return Ok(None);
        };
        session.user.name = name.to_string();
        session.user.email = email.to_string();
        let user = serde_json::to_string(&session.user)
            .map_err(|e| ClientError::Storage(format!("serialize user: {}", e)))?;
        self.store.set(StorageKey::User, &user)?;
        Ok(Some(session.user))
    }

    pub fn remembered_email(&self) -> Result<Option<String>, ClientError> {
        self.store.get(StorageKey::RememberedEmail)
    }

    pub fn set_remembered_email(&self, email: Option<&str>) -> Result<(), ClientError> {
        match email {
            Some(email) => self.store.set(StorageKey::RememberedEmail, email),
            None => self.store.remove(StorageKey::RememberedEmail),
        }
    }
}
