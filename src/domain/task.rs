use super::enums::{Category, Priority};
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// One step inside a task. Ids are only unique within the parent task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: u64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl Subtask {
    pub fn new(id: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
        }
    }

    /// Blank steps are dropped when an edited list is saved
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Pick an id for a new step: time-based, but always above the ids already in use
pub fn next_subtask_id(existing: &[Subtask], now: DateTime<Local>) -> u64 {
    let now_ms = u64::try_from(now.timestamp_millis()).unwrap_or(0);
    let above_existing = existing.iter().map(|s| s.id.saturating_add(1)).max().unwrap_or(0);
    now_ms.max(above_existing)
}

/// Remove blank steps, keeping the order of the rest
pub fn prune_blank_subtasks(subtasks: Vec<Subtask>) -> Vec<Subtask> {
    subtasks.into_iter().filter(|s| !s.is_blank()).collect()
}

/// A task in the flat task collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub habit_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subtasks: Vec<Subtask>,
    pub created_at: DateTime<Local>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Task {
    /// Build a task from creation input, filling in defaults
    pub fn from_new(id: String, created_at: DateTime<Local>, data: NewTask) -> Self {
        Self {
            id,
            title: data.title,
            category: data.category.unwrap_or_default(),
            completed: false,
            priority: data.priority.unwrap_or_default(),
            time: data.time.filter(|t| !t.is_empty()),
            description: data.description.unwrap_or_default(),
            habit_id: data.habit_id.filter(|h| !h.is_empty()),
            subtasks: data.subtasks,
            created_at,
        }
    }

    /// Habit tasks are owned by a habit and hidden from the general lists
    pub fn is_habit_task(&self) -> bool {
        self.habit_id.is_some()
    }

    /// Check whether the task was created on the given local calendar day
    pub fn created_on(&self, date: NaiveDate) -> bool {
        self.created_at.date_naive() == date
    }

    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }

    /// Flip one step; returns false when no step has that id
    pub fn toggle_subtask(&mut self, subtask_id: u64) -> bool {
        match self.subtasks.iter_mut().find(|s| s.id == subtask_id) {
            Some(subtask) => {
                subtask.completed = !subtask.completed;
                true
            }
            None => false,
        }
    }

    /// (completed steps, total steps)
    pub fn subtask_progress(&self) -> (usize, usize) {
        let done = self.subtasks.iter().filter(|s| s.completed).count();
        (done, self.subtasks.len())
    }
}

/// Input for creating a task. Only the title is required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub time: Option<String>,
    pub description: Option<String>,
    pub habit_id: Option<String>,
    pub subtasks: Vec<Subtask>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn habit(mut self, habit_id: impl Into<String>) -> Self {
        self.habit_id = Some(habit_id.into());
        self
    }
}

/// Partial update merged into an existing task. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub category: Option<Category>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    /// `Some(None)` clears the time
    pub time: Option<Option<String>>,
    pub description: Option<String>,
    /// `Some(None)` detaches the task from its habit
    pub habit_id: Option<Option<String>>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Shallow merge. `id`, `created_at` and the steps are never touched.
    pub fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(time) = self.time {
            task.time = time;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(habit_id) = self.habit_id {
            task.habit_id = habit_id;
        }
    }
}
