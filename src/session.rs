//! # Session identity
//!
//! The backend keys carts by an opaque session id sent in the `x-session-id`
//! header. [`SessionIdentity`] creates that id on first use, persists it through
//! a [`SessionStore`] and hands out the same value for the rest of the process.
//!
//! Without a store (e.g. when rendering outside a browser-like context) the id
//! is the empty string. Getting the id never fails.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Storage key, also used as the file name by [`FileSessionStore`].
pub const SESSION_KEY: &str = "x-session-id";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Where the session id survives between runs.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, SessionError>;
    fn save(&self, id: &str) -> Result<(), SessionError>;
}

/// Keeps the id in a single file inside a directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SESSION_KEY),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let id = raw.trim();
                Ok((!id.is_empty()).then(|| id.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, id: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, id)?;
        Ok(())
    }
}

/// Process-local store for tests and short-lived contexts.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    value: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(id.into())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        Ok(self
            .value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, id: &str) -> Result<(), SessionError> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(id.to_string());
        Ok(())
    }
}

/// Lazily created, persisted session id.
#[derive(Clone)]
pub struct SessionIdentity {
    store: Option<Arc<dyn SessionStore>>,
    cached: Arc<OnceLock<String>>,
}

impl SessionIdentity {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store: Some(store),
            cached: Arc::new(OnceLock::new()),
        }
    }

    /// No persistent storage: every call yields the empty string.
    pub fn unavailable() -> Self {
        Self {
            store: None,
            cached: Arc::new(OnceLock::new()),
        }
    }

    /// File-backed identity when a directory is configured, otherwise unavailable.
    pub fn from_dir(dir: Option<&Path>) -> Self {
        match dir {
            Some(dir) => Self::new(Arc::new(FileSessionStore::new(dir))),
            None => Self::unavailable(),
        }
    }

    pub fn get_or_create(&self) -> String {
        let Some(store) = &self.store else {
            debug!("No session storage, using empty session id");
            return String::new();
        };
        self.cached
            .get_or_init(|| load_or_generate(store.as_ref()))
            .clone()
    }
}

fn load_or_generate(store: &dyn SessionStore) -> String {
    match store.load() {
        Ok(Some(id)) => return id,
        Ok(None) => {}
        Err(e) => warn!(error = %e, "Could not read session id, generating a new one"),
    }

    let id = Uuid::new_v4().to_string();
    match store.save(&id) {
        Ok(()) => info!(session_id = %id, "Session created"),
        // The id still works for this process; the next run gets a new cart.
        Err(e) => warn!(error = %e, "Could not persist session id"),
    }
    id
}
