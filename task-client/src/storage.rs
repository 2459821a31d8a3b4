// task-client/src/storage.rs
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Process-local key-value slots that outlive the process when backed by a file.
///
/// Reads never fail. Writes update the in-memory map first and then replace
/// the backing file as a whole (temp file + rename), so a reader of the file
/// sees either the previous or the new contents, never a torn write.
pub struct LocalStorage {
    entries: DashMap<String, String>,
    path: Option<PathBuf>,
    // Serializes file replacement so the last writer's snapshot wins
    flush_lock: Mutex<()>,
}

impl LocalStorage {
    /// Storage that lives only as long as this value
    pub fn in_memory() -> Self {
        Self {
            entries: DashMap::new(),
            path: None,
            flush_lock: Mutex::new(()),
        }
    }

    /// Open storage backed by a JSON file. A missing or unreadable file
    /// starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = DashMap::new();

        match load_entries(&path) {
            Ok(Some(loaded)) => {
                tracing::debug!("Loaded {} storage entries from {}", loaded.len(), path.display());
                for (key, value) in loaded {
                    entries.insert(key, value);
                }
            },
            Ok(None) => {
                tracing::debug!("No storage file at {}, starting empty", path.display());
            },
            Err(e) => {
                tracing::warn!("Ignoring unreadable storage file {}: {}", path.display(), e);
            }
        }

        Self {
            entries,
            path: Some(path),
            flush_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get_item(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn set_item(&self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
        self.flush();
    }

    /// Returns whether the key was present
    pub fn remove_item(&self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.flush();
        }
        removed
    }

    fn flush(&self) {
        let Some(path) = &self.path else {
            return;
        };

        let _guard = match self.flush_lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        // Snapshot under the lock so a later flush never writes older state
        let snapshot: BTreeMap<String, String> = self.entries.iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        if let Err(e) = write_entries(path, &snapshot) {
            tracing::warn!("Failed to persist storage to {}: {}", path.display(), e);
        }
    }
}

fn load_entries(path: &Path) -> io::Result<Option<BTreeMap<String, String>>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn write_entries(path: &Path, entries: &BTreeMap<String, String>) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let body = serde_json::to_vec_pretty(entries)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body)?;
    fs::rename(&tmp, path)
}
