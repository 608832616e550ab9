//! File-backed session store
//!
//! Keeps the session in `session.json` inside the F-Pass directory:
//! ```json
//! { "access_token": "...", "user": "{...}", "wallet": "{...}" }
//! ```
//! Every read takes a shared lock and every read-modify-write an exclusive
//! lock on `session.lock`, so two processes sharing the directory (the
//! equivalent of two browser tabs) never interleave partial writes. The
//! session itself is still shared between them.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::warn;

use crate::domain::result::Result;
use crate::ports::SessionStore;

const SESSION_FILE: &str = "session.json";
const LOCK_FILE: &str = "session.lock";

type Entries = BTreeMap<String, String>;

/// Session store persisted as a JSON object on disk
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileSessionStore {
    /// Create a store inside `dir`, creating the directory if needed
    pub fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(SESSION_FILE),
            lock_path: dir.join(LOCK_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_lock(&self) -> Result<File> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)?;
        Ok(file)
    }

    fn read_entries(&self) -> Result<Entries> {
        if !self.path.exists() {
            return Ok(Entries::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Entries::new());
        }
        // A damaged file holds no usable session; the next write replaces it
        Ok(serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "ignoring unreadable session file");
            Entries::new()
        }))
    }

    fn write_entries(&self, entries: &Entries) -> Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Run `f` on the entries under the exclusive lock and persist the result
    fn modify(&self, f: impl FnOnce(&mut Entries)) -> Result<()> {
        let lock = self.open_lock()?;
        FileExt::lock_exclusive(&lock)?;

        let result = self.read_entries().and_then(|mut entries| {
            f(&mut entries);
            self.write_entries(&entries)
        });

        FileExt::unlock(&lock)?;
        result
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let lock = self.open_lock()?;
        FileExt::lock_shared(&lock)?;
        let result = self.read_entries().map(|mut entries| entries.remove(key));
        FileExt::unlock(&lock)?;
        result
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.modify(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_all(&self, keys: &[&str]) -> Result<()> {
        self.modify(|entries| {
            for key in keys {
                entries.remove(*key);
            }
        })
    }
}
