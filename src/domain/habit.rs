use chrono::{DateTime, Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_HABIT_ICON: &str = "fitness";
pub const DEFAULT_HABIT_COLOR: &str = "#8B5CF6";
pub const DEFAULT_HABIT_GOAL: u32 = 30;

/// Slot in the weekly progress bitmap for a date (0 = Sunday .. 6 = Saturday)
pub fn weekday_slot(date: NaiveDate) -> usize {
    date.weekday().num_days_from_sunday() as usize
}

/// A task embedded in a tracked habit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitTask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Local>,
}

/// A tracked habit with streaks and a per-weekday completion bitmap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_goal")]
    pub goal: u32,
    /// Number of times the habit has been marked complete
    #[serde(default)]
    pub completed: u32,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default)]
    pub weekly_progress: [bool; 7],
    #[serde(default)]
    pub tasks: Vec<HabitTask>,
    pub created_at: DateTime<Local>,
}

fn default_icon() -> String {
    DEFAULT_HABIT_ICON.to_string()
}

fn default_color() -> String {
    DEFAULT_HABIT_COLOR.to_string()
}

fn default_goal() -> u32 {
    DEFAULT_HABIT_GOAL
}

impl Habit {
    pub fn from_new(id: String, created_at: DateTime<Local>, data: NewHabit) -> Self {
        Self {
            id,
            title: data.title,
            description: data.description.unwrap_or_default(),
            icon: data.icon.unwrap_or_else(default_icon),
            color: data.color.unwrap_or_else(default_color),
            goal: data.goal.filter(|g| *g > 0).unwrap_or(DEFAULT_HABIT_GOAL),
            completed: 0,
            streak: 0,
            longest_streak: 0,
            weekly_progress: [false; 7],
            tasks: data.tasks,
            created_at,
        }
    }

    /// Record one completion on `date`. Repeated calls on the same day count again.
    pub fn mark_complete(&mut self, date: NaiveDate) {
        self.completed += 1;
        self.streak += 1;
        self.longest_streak = self.longest_streak.max(self.streak);
        self.weekly_progress[weekday_slot(date)] = true;
    }

    pub fn is_done_on(&self, date: NaiveDate) -> bool {
        self.weekly_progress[weekday_slot(date)]
    }

    /// Flip an embedded task; returns false when no task has that id
    pub fn toggle_task(&mut self, task_id: &str) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == task_id) {
            Some(task) => {
                task.completed = !task.completed;
                true
            }
            None => false,
        }
    }

    pub fn remove_task(&mut self, task_id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != task_id);
        self.tasks.len() != before
    }

    /// Progress towards the goal as a whole percentage, capped at 100
    pub fn goal_percent(&self) -> u32 {
        if self.goal == 0 {
            return 0;
        }
        let percent = (self.completed as f64 / self.goal as f64 * 100.0).round() as u32;
        percent.min(100)
    }

    /// Render the weekly bitmap as seven characters, Sunday first
    pub fn week_strip(&self) -> String {
        self.weekly_progress
            .iter()
            .map(|done| if *done { '■' } else { '□' })
            .collect()
    }
}

/// Input for creating a tracked habit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewHabit {
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub goal: Option<u32>,
    pub tasks: Vec<HabitTask>,
}

impl NewHabit {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update merged into a tracked habit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HabitUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub goal: Option<u32>,
    pub streak: Option<u32>,
    pub weekly_progress: Option<[bool; 7]>,
}

impl HabitUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(self, habit: &mut Habit) {
        if let Some(title) = self.title {
            habit.title = title;
        }
        if let Some(description) = self.description {
            habit.description = description;
        }
        if let Some(icon) = self.icon {
            habit.icon = icon;
        }
        if let Some(color) = self.color {
            habit.color = color;
        }
        if let Some(goal) = self.goal {
            habit.goal = goal;
        }
        if let Some(streak) = self.streak {
            habit.streak = streak;
        }
        if let Some(weekly_progress) = self.weekly_progress {
            habit.weekly_progress = weekly_progress;
        }
    }
}

/// Input for a task embedded in a tracked habit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewHabitTask {
    pub title: String,
    pub time: Option<String>,
}

/// Category-grouped habit entry kept next to the task list.
///
/// Its tasks live in the flat task collection and point back here through
/// `habit_id`; the `tasks` field is carried along but never filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub tasks: Vec<String>,
    pub created_at: DateTime<Local>,
}

/// Input for a category-grouped habit entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewHabitSummary {
    pub title: String,
    pub category: String,
    pub icon: String,
    pub color: String,
}
