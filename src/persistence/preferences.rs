use super::queue::PersistQueue;
use log::error;

pub const THEME_KEY: &str = "theme";

/// Display preferences stored next to the task data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    pub dark_mode: bool,
}

/// Load preferences. A missing, unreadable or malformed value means light mode.
pub fn load_preferences(queue: &PersistQueue) -> Preferences {
    let dark_mode = match queue.load(THEME_KEY) {
        Ok(Some(raw)) => match serde_json::from_str::<bool>(&raw) {
            Ok(flag) => flag,
            Err(err) => {
                error!("event=theme_load module=preferences status=error reason=decode error={}", err);
                false
            }
        },
        Ok(None) => false,
        Err(err) => {
            error!("event=theme_load module=preferences status=error reason=storage error={}", err);
            false
        }
    };
    Preferences { dark_mode }
}

/// Queue the preferences for saving
pub fn save_preferences(queue: &PersistQueue, preferences: &Preferences) {
    // A bool always encodes
    queue.save(THEME_KEY, preferences.dark_mode.to_string());
}

/// Flip dark mode, save it and return the new value
pub fn toggle_dark_mode(queue: &PersistQueue) -> Preferences {
    let mut preferences = load_preferences(queue);
    preferences.dark_mode = !preferences.dark_mode;
    save_preferences(queue, &preferences);
    preferences
}
