//! Persistence gateway for workflow blobs
//!
//! The engine persists through an opaque key-value blob store. Writes are
//! best-effort: implementations log failures instead of propagating them,
//! and the in-memory state stays authoritative either way.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

/// Storage key for the committed workflow graph
pub const WORKFLOW_KEY: &str = "workflow";

/// Storage key for the saved canvas viewport
pub const VIEWPORT_KEY: &str = "viewport";

/// Opaque blob store keyed by string
pub trait BlobStore: Send + Sync {
    /// Load the blob stored under `key`, if any
    fn load(&self, key: &str) -> Option<serde_json::Value>;

    /// Store `value` under `key`, best-effort
    fn save(&self, key: &str, value: &serde_json::Value);
}

/// File-backed blob store, one `<key>.json` file per key
///
/// The directory is created on first save if it doesn't exist.
#[derive(Debug)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    /// Create a store rooted at the given directory
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl BlobStore for FileBlobStore {
    fn load(&self, key: &str) -> Option<serde_json::Value> {
        let path = self.blob_path(key);
        let content = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Failed to parse blob from {:?}: {}", path, e);
                None
            }
        }
    }

    fn save(&self, key: &str, value: &serde_json::Value) {
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            log::warn!("Failed to create blob directory {:?}: {}", self.dir, e);
            return;
        }
        let path = self.blob_path(key);
        match serde_json::to_string_pretty(value) {
            Ok(content) => {
                if let Err(e) = std::fs::write(&path, content) {
                    log::warn!("Failed to write blob to {:?}: {}", path, e);
                } else {
                    log::debug!("Saved blob '{}' to {:?}", key, path);
                }
            }
            Err(e) => log::warn!("Failed to serialize blob '{}': {}", key, e),
        }
    }
}

/// In-memory blob store for tests and ephemeral hosts
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, serde_json::Value>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn load(&self, key: &str) -> Option<serde_json::Value> {
        self.blobs.lock().get(key).cloned()
    }

    fn save(&self, key: &str, value: &serde_json::Value) {
        self.blobs.lock().insert(key.to_string(), value.clone());
    }
}
