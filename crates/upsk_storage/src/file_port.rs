#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{KeyValuePort, StorageError};

const STORAGE_DOCUMENT_SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageDocument {
    schema_version: u8,
    entries: BTreeMap<String, String>,
}

impl Default for StorageDocument {
    fn default() -> Self {
        Self {
            schema_version: STORAGE_DOCUMENT_SCHEMA_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// Key-value port backed by one JSON document on disk.
///
/// Every read goes to disk and every write atomically replaces the document,
/// so two handles on the same path observe each other's writes.
#[derive(Debug, Clone)]
pub struct FileKeyValue {
    path: PathBuf,
}

impl FileKeyValue {
    pub fn default_local() -> Self {
        let path = env::var("UPSK_STORAGE_PATH")
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_storage_path);
        Self::for_path(path)
    }

    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<StorageDocument, StorageError> {
        if !self.path.exists() {
            return Ok(StorageDocument::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(StorageDocument::default());
        }
        let doc = serde_json::from_str::<StorageDocument>(&raw)?;
        if doc.schema_version != STORAGE_DOCUMENT_SCHEMA_VERSION {
            return Err(StorageError::SchemaVersion(doc.schema_version));
        }
        Ok(doc)
    }

    /// A document that does not parse is moved aside to `<path>.corrupt` and
    /// replaced. Read failures and unknown schema versions are returned so
    /// the entries of a newer or unreadable document are never dropped.
    fn read_document_for_write(&self) -> Result<StorageDocument, StorageError> {
        match self.read_document() {
            Ok(doc) => Ok(doc),
            Err(StorageError::Json(err)) => {
                let backup = self.corrupt_backup_path();
                fs::rename(&self.path, &backup)?;
                warn!(
                    path = %self.path.display(),
                    backup = %backup.display(),
                    error = %err,
                    "storage document unparseable; moved aside and replaced"
                );
                Ok(StorageDocument::default())
            }
            Err(err) => Err(err),
        }
    }

    fn corrupt_backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".corrupt");
        PathBuf::from(name)
    }

    fn write_document(&self, doc: &StorageDocument) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let serialized = serde_json::to_vec_pretty(doc)?;
        atomic_write(&self.path, &serialized)?;
        Ok(())
    }
}

impl KeyValuePort for FileKeyValue {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_document()?.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut doc = self.read_document_for_write()?;
        doc.entries.insert(key.to_string(), value.to_string());
        self.write_document(&doc)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut doc = self.read_document_for_write()?;
        doc.entries.remove(key);
        self.write_document(&doc)
    }
}

fn default_storage_path() -> PathBuf {
    if let Ok(xdg_config_home) = env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg_config_home)
            .join("upsk")
            .join("portal_storage.json");
    }
    if let Ok(home) = env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join("upsk")
            .join("portal_storage.json");
    }
    PathBuf::from(".upsk").join("portal_storage.json")
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<(), StorageError> {
    let mut tmp = path.to_path_buf();
    tmp.set_extension("tmp");
    fs::write(&tmp, data)?;
    fs::rename(tmp, path)?;
    Ok(())
}
