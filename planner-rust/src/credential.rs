use crate::PlannerError;
use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

/// Key under which the Gemini API key is stored.
pub const CREDENTIAL_KEY: &str = "gemini_api_key";

/// A persistent string key/value store.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, PlannerError>;
    fn set(&self, key: &str, value: &str) -> Result<(), PlannerError>;
}

/// Keeps entries for the lifetime of the process only.
#[derive(Default)]
pub struct MemoryCredentialStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `api_key` under [`CREDENTIAL_KEY`].
    #[must_use]
    pub fn with_api_key(api_key: &str) -> Self {
        let store = Self::default();
        store
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(CREDENTIAL_KEY.to_string(), api_key.to_string());
        store
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>, PlannerError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PlannerError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Stores entries as a flat JSON object in a single file. A missing file is
/// an empty store; the file and its parent directories are created on the
/// first write.
///
/// Reads and writes use blocking `std::fs` and happen on the calling task.
/// The file is a local one holding a handful of short strings, read once per
/// planner operation, so the blocking time stays below that of a single
/// request. Keep it off network mounts.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, PlannerError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|error| {
            PlannerError::Credential(format!(
                "{} is not a valid credential file: {error}",
                self.path.display()
            ))
        })
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>, PlannerError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PlannerError> {
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());

        let content = serde_json::to_string_pretty(&entries)
            .map_err(|error| PlannerError::Credential(error.to_string()))?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, content)?;
        Ok(())
    }
}
