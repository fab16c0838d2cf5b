//! File-backed key-value store.
//!
//! Each namespace is one pretty-printed JSON file in the data directory.
//! Writes go to a temporary file first and are renamed into place.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;
use wx_sdk::{HostError, HostResult, StateStore};

/// State store that keeps one JSON file per namespace.
#[derive(Debug)]
pub struct FileStateStore {
    dir: PathBuf,
    /// Serializes writers so a read never sees a half-renamed file.
    write_lock: Mutex<()>,
}

impl FileStateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding `namespace`. Characters outside `[A-Za-z0-9_-]` become
    /// underscores so a namespace can never escape the data directory.
    fn path_for(&self, namespace: &str) -> PathBuf {
        let safe: String = namespace
            .chars()
            .map(|c| match c {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
                _ => '_',
            })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl StateStore for FileStateStore {
    fn get_state(&self, namespace: &str) -> HostResult<Option<Value>> {
        let path = self.path_for(namespace);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        debug!(namespace, path = %path.display(), "state loaded");
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn put_item_in_store(&self, namespace: &str, value: Value) -> HostResult<()> {
        let path = self.path_for(namespace);
        let bytes = serde_json::to_vec_pretty(&value)?;

        let _guard = self.write_lock.lock();
        std::fs::create_dir_all(&self.dir)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &path).map_err(|e| {
            HostError::Storage(format!("failed to replace {}: {e}", path.display()))
        })?;
        debug!(namespace, path = %path.display(), "state written");
        Ok(())
    }
}
