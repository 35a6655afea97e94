pub mod habit_store;
pub mod ids;
pub mod seed;
pub mod task_store;

pub use habit_store::{HabitAction, HabitStore};
pub use ids::{system_clock, Clock};
pub use task_store::{TaskAction, TaskStore};

use crate::persistence::preferences::THEME_KEY;
use crate::persistence::{PersistQueue, StorageError};
use log::{error, info};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Every key the app writes; `reset` removes exactly these
pub const STORAGE_KEYS: [&str; 4] = [
    task_store::TASKS_KEY,
    task_store::TASK_HABITS_KEY,
    habit_store::HABITS_KEY,
    THEME_KEY,
];

/// Outcome of reading one persisted collection
enum Loaded<T> {
    Found(Vec<T>),
    Missing,
    Failed,
}

fn load_collection<T: DeserializeOwned>(persist: &PersistQueue, key: &str) -> Loaded<T> {
    let raw = match persist.load(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Loaded::Missing,
        Err(err) => {
            error!("event=store_load module=store status=error key={} error={}", key, err);
            return Loaded::Failed;
        }
    };

    match serde_json::from_str::<Vec<T>>(&raw) {
        Ok(items) => {
            info!("event=store_load module=store status=ok key={} count={}", key, items.len());
            Loaded::Found(items)
        }
        Err(source) => {
            let err = StorageError::Decode {
                key: key.to_string(),
                source,
            };
            error!("event=store_load module=store status=error key={} error={}", key, err);
            Loaded::Failed
        }
    }
}

fn save_collection<T: Serialize>(persist: &PersistQueue, key: &str, items: &[T]) {
    match serde_json::to_string(items) {
        Ok(json) => persist.save(key, json),
        Err(source) => {
            let err = StorageError::Encode {
                key: key.to_string(),
                source,
            };
            error!("event=store_save module=store status=error key={} error={}", key, err);
        }
    }
}
