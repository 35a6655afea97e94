use chrono::{DateTime, Local};

/// Source of the current time for a store
pub type Clock = fn() -> DateTime<Local>;

pub fn system_clock() -> DateTime<Local> {
    Local::now()
}

/// Time-based ids (milliseconds since the epoch), strictly increasing
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    /// Start above every numeric id already in use; non-numeric ids are ignored
    pub fn above<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let last = ids
            .into_iter()
            .filter_map(|id| id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);
        Self { last }
    }

    pub fn next(&mut self, now: DateTime<Local>) -> String {
        let candidate = now.timestamp_millis().max(self.last.saturating_add(1));
        self.last = candidate;
        candidate.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ids_increase_within_same_millisecond() {
        let now = Local.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();
        let mut ids = IdGenerator::default();

        let first = ids.next(now);
        let second = ids.next(now);
        assert_eq!(first, now.timestamp_millis().to_string());
        assert_eq!(second, (now.timestamp_millis() + 1).to_string());
    }

    #[test]
    fn test_ids_start_above_loaded_ids() {
        let now = Local.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();
        let future = (now.timestamp_millis() + 1_000).to_string();
        let mut ids = IdGenerator::above(["habit-task-1", "3", future.as_str()]);

        assert_eq!(ids.next(now), (now.timestamp_millis() + 1_001).to_string());
    }
}
