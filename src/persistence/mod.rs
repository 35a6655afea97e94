pub mod error;
pub mod files;
pub mod kv;
pub mod preferences;
pub mod queue;

pub use error::StorageError;
pub use files::{ensure_data_dir, init_local_data_dir, log_dir};
pub use kv::{FileStore, KeyValueStore};
pub use preferences::{load_preferences, toggle_dark_mode, Preferences};
pub use queue::PersistQueue;
