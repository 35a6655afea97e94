use super::error::StorageError;
use super::files::{atomic_write, key_file, read_file};
use std::fs;
use std::path::PathBuf;

/// Local key-value storage used by the stores
pub trait KeyValueStore: Send + Sync {
    /// Read the value for `key`, `None` when nothing was ever saved
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value for `key`
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove every key the store owns
    fn clear(&self) -> Result<(), StorageError>;
}

/// One `<key>.json` file per key inside a directory.
///
/// The directory may be shared with other files, so `clear` only removes the
/// files of the keys listed at construction.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    owned_keys: Vec<String>,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>, owned_keys: &[&str]) -> Self {
        Self {
            dir: dir.into(),
            owned_keys: owned_keys.iter().map(|key| key.to_string()).collect(),
        }
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        read_file(key_file(&self.dir, key)).map_err(|e| StorageError::io(key, e))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        atomic_write(key_file(&self.dir, key), value).map_err(|e| StorageError::io(key, e))
    }

    fn clear(&self) -> Result<(), StorageError> {
        for key in &self.owned_keys {
            match fs::remove_file(key_file(&self.dir, key)) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(StorageError::io(key, e)),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub use memory::MemoryStore;

#[cfg(test)]
mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// In-memory store with switches to simulate failing reads and writes
    #[derive(Debug, Default)]
    pub struct MemoryStore {
        entries: Mutex<HashMap<String, String>>,
        fail_loads: AtomicBool,
        fail_saves: AtomicBool,
    }

    impl MemoryStore {
        pub fn with_entry(key: &str, value: &str) -> Self {
            let store = Self::default();
            store
                .entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            store
        }

        pub fn set_fail_loads(&self, fail: bool) {
            self.fail_loads.store(fail, Ordering::SeqCst);
        }

        pub fn set_fail_saves(&self, fail: bool) {
            self.fail_saves.store(fail, Ordering::SeqCst);
        }

        pub fn get(&self, key: &str) -> Option<String> {
            self.entries.lock().unwrap().get(key).cloned()
        }
    }

    impl KeyValueStore for MemoryStore {
        fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
            if self.fail_loads.load(Ordering::SeqCst) {
                return Err(StorageError::Unavailable(format!("load of `{}` refused", key)));
            }
            Ok(self.get(key))
        }

        fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(StorageError::Unavailable(format!("save of `{}` refused", key)));
            }
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn clear(&self) -> Result<(), StorageError> {
            self.entries.lock().unwrap().clear();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: &[&str] = &["tasks", "habits", "taskHabits", "theme"];

    #[test]
    fn test_file_store_missing_key() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(temp_dir.path(), KEYS);
        assert!(store.load("tasks").unwrap().is_none());
    }

    #[test]
    fn test_file_store_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(temp_dir.path(), KEYS);

        store.save("theme", "true").unwrap();
        assert_eq!(store.load("theme").unwrap().as_deref(), Some("true"));
        assert!(temp_dir.path().join("theme.json").exists());
    }

    #[test]
    fn test_file_store_clear_keeps_other_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(temp_dir.path(), KEYS);
        store.save("tasks", "[]").unwrap();
        store.save("habits", "[]").unwrap();
        fs::write(temp_dir.path().join("report-2026-10-16.md"), "# report").unwrap();
        fs::write(temp_dir.path().join("package.json"), "{}").unwrap();

        store.clear().unwrap();

        assert!(store.load("tasks").unwrap().is_none());
        assert!(store.load("habits").unwrap().is_none());
        assert!(temp_dir.path().join("report-2026-10-16.md").exists());
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("package.json")).unwrap(),
            "{}"
        );
    }

    #[test]
    fn test_file_store_save_into_missing_dir_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(temp_dir.path().join("gone"), KEYS);
        let err = store.save("tasks", "[]").unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }

    #[test]
    fn test_memory_store_failure_switches() {
        let store = MemoryStore::with_entry("tasks", "[]");
        store.set_fail_loads(true);
        assert!(store.load("tasks").is_err());
        store.set_fail_loads(false);
        assert_eq!(store.load("tasks").unwrap().as_deref(), Some("[]"));

        store.set_fail_saves(true);
        assert!(store.save("tasks", "[1]").is_err());
        assert_eq!(store.get("tasks").as_deref(), Some("[]"));
    }
}
