//! Session store port - persisted key/value storage for the session

use crate::domain::result::Result;

/// Key/value storage that survives between runs
///
/// Holds the bearer token, the serialized user and the wallet snapshot under
/// the fixed keys in [`crate::domain::SESSION_KEYS`]. Implementations must be
/// safe to share between tasks; the `SessionManager` is the only caller.
pub trait SessionStore: Send + Sync {
    /// Read a value, `None` when the key is absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove several keys in one write; missing keys are ignored
    fn remove_all(&self, keys: &[&str]) -> Result<()>;

    /// Remove a key; a missing key is not an error
    fn remove(&self, key: &str) -> Result<()> {
        self.remove_all(&[key])
    }
}
