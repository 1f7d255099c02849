//! Welcome intro
//!
//! Whether the shopper has already dismissed the welcome intro. The flag lives in a
//! key-value store, is read once when [`WelcomeIntro`] is loaded and written once when the
//! intro is dismissed.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, info};

/// Key under which the flag is stored.
pub const WELCOME_INTRO_KEY: &str = "hasSeenWelcomeVideo";

/// Errors raised by persistent stores.
#[derive(Debug, Error)]
pub enum IntroError {
    /// IO error reading or writing the store file
    #[error("Failed to access store file: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing or serialization error
    #[error("Failed to parse store file: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// String key-value storage that survives restarts.
pub trait KeyValueStore {
    /// Value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an [`IntroError`] if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, IntroError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an [`IntroError`] if the store cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), IntroError>;
}

/// In-memory store, for tests and one-off runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: FxHashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, IntroError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), IntroError> {
        self.values.insert(key.to_string(), value.to_string());

        Ok(())
    }
}

/// Store backed by a YAML map on disk. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Use the file at `path`. Nothing is read or created until the store is used.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, IntroError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_norway::from_str(&contents)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, IntroError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), IntroError> {
        let mut values = self.read_all()?;

        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, serde_norway::to_string(&values)?)?;

        Ok(())
    }
}

/// The welcome intro's "already seen" flag.
#[derive(Debug)]
pub struct WelcomeIntro<S> {
    store: S,
    seen: bool,
}

impl<S: KeyValueStore> WelcomeIntro<S> {
    /// Read the flag from `store`. Any non-empty stored value counts as seen.
    ///
    /// # Errors
    ///
    /// Returns an [`IntroError`] if the store cannot be read.
    pub fn load(store: S) -> Result<Self, IntroError> {
        let seen = store
            .get(WELCOME_INTRO_KEY)?
            .is_some_and(|value| !value.is_empty());

        debug!(seen, "loaded welcome intro flag");

        Ok(Self { store, seen })
    }

    /// Whether the intro should be shown.
    #[must_use]
    pub fn should_show(&self) -> bool {
        !self.seen
    }

    /// Record that the intro was closed or skipped. Later calls do nothing.
    ///
    /// # Errors
    ///
    /// Returns an [`IntroError`] if the store cannot be written.
    pub fn dismiss(&mut self) -> Result<(), IntroError> {
        if self.seen {
            return Ok(());
        }

        self.store.set(WELCOME_INTRO_KEY, "true")?;
        self.seen = true;

        info!("welcome intro dismissed");

        Ok(())
    }

    /// The backing store
    pub fn store(&self) -> &S {
        &self.store
    }
}
