use log::{debug, warn};

use survey_review::{ReviewError, StateStore};

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File-backed durable key-value state: one JSON object mapping entry names
/// to string payloads. The whole file is rewritten on every write, so the
/// persisted copy is consistent with memory by the time a write returns.
pub struct FileState {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileState {
    /// Opens the state at `path`. A missing or unreadable file means an empty
    /// state, never a failure.
    pub fn open<P: AsRef<Path>>(path: P) -> FileState {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!("open: discarding unreadable state file {:?}: {}", path, e);
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("open: no state file at {:?} yet", path);
                HashMap::new()
            }
            Err(e) => {
                warn!("open: could not read state file {:?}: {}", path, e);
                HashMap::new()
            }
        };
        FileState { path, entries }
    }
}

impl StateStore for FileState {
    fn get(&mut self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), ReviewError> {
        self.entries.insert(key.to_string(), value.to_string());
        let payload = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| ReviewError::PersistFailed(e.to_string()))?;
        fs::write(&self.path, payload).map_err(|e| ReviewError::PersistFailed(e.to_string()))
    }
}
