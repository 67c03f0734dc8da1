use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;

const APP_DIR: &str = "cardfile";

/// Store key for the contact collection.
pub const CONTACTS_KEY: &str = "contacts_v1";
/// Store key for the tag collection.
pub const TAGS_KEY: &str = "tags_v1";

/// Key-value store over one JSON file per key.
///
/// Collections are written whole on every save; there is no incremental
/// update. Per-entry read and write failures never reach the caller:
/// reads fall back, writes are best-effort.
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Open the store at `data_dir`, or at the platform data directory
    /// when none is given. Creates the directory if needed.
    pub fn open(data_dir: Option<&Path>) -> Result<Self> {
        let root = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => {
                let base = BaseDirs::new().context("unable to determine data directories")?;
                base.data_dir().join(APP_DIR)
            }
        };
        fs::create_dir_all(&root)
            .with_context(|| format!("failed to create data dir: {}", root.display()))?;
        Ok(Self { root })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    /// Read the collection stored under `key`. A missing, unreadable, or
    /// malformed entry yields `fallback`.
    pub fn load<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let Ok(raw) = fs::read_to_string(self.entry_path(key)) else {
            return fallback;
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(_) => fallback,
        }
    }

    /// Serialize `value` under `key`, replacing any previous entry. Write
    /// failures are dropped; the in-memory state stays authoritative.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) {
        let Ok(raw) = serde_json::to_string_pretty(value) else {
            return;
        };
        let _ = fs::write(self.entry_path(key), raw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(Some(dir.path())).unwrap();
        (dir, store)
    }

    #[test]
    fn test_load_missing_returns_fallback() {
        let (_dir, store) = temp_store();
        let value: Vec<String> = store.load("absent", vec!["seed".to_string()]);
        assert_eq!(value, vec!["seed".to_string()]);
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let (_dir, store) = temp_store();
        let value = vec!["a".to_string(), "b".to_string()];
        store.save("names", &value);
        let loaded: Vec<String> = store.load("names", Vec::new());
        assert_eq!(loaded, value);
    }

    #[test]
    fn test_load_malformed_returns_fallback() {
        let (dir, store) = temp_store();
        fs::write(dir.path().join("names.json"), "{not json").unwrap();
        let loaded: Vec<String> = store.load("names", vec!["fallback".to_string()]);
        assert_eq!(loaded, vec!["fallback".to_string()]);
    }

    #[test]
    fn test_save_overwrites_previous_entry() {
        let (_dir, store) = temp_store();
        store.save("names", &vec!["old".to_string()]);
        store.save("names", &vec!["new".to_string()]);
        let loaded: Vec<String> = store.load("names", Vec::new());
        assert_eq!(loaded, vec!["new".to_string()]);
    }
}
