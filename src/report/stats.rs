use crate::domain::{Category, Habit, Task};
use chrono::NaiveDate;

/// Per-category totals for the regular tasks of one day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStats {
    pub category: Category,
    pub total: usize,
    pub completed: usize,
}

/// Habit task totals for one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HabitTaskStats {
    pub total: usize,
    pub completed: usize,
}

/// Aggregate habit numbers across every tracked habit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HabitStats {
    pub habit_count: usize,
    pub done_today: usize,
    pub best_streak: u32,
    pub total_completions: u32,
}

/// Categories with at least one non-habit task created on `date`, in category order
pub fn calculate_category_stats(tasks: &[Task], date: NaiveDate) -> Vec<CategoryStats> {
    Category::all()
        .iter()
        .map(|&category| {
            let day_tasks: Vec<&Task> = tasks
                .iter()
                .filter(|t| t.category == category && t.created_on(date) && !t.is_habit_task())
                .collect();
            CategoryStats {
                category,
                total: day_tasks.len(),
                completed: day_tasks.iter().filter(|t| t.completed).count(),
            }
        })
        .filter(|stats| stats.total > 0)
        .collect()
}

pub fn calculate_habit_task_stats(tasks: &[Task], date: NaiveDate) -> HabitTaskStats {
    let day_tasks: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.is_habit_task() && t.created_on(date))
        .collect();
    HabitTaskStats {
        total: day_tasks.len(),
        completed: day_tasks.iter().filter(|t| t.completed).count(),
    }
}

pub fn calculate_habit_stats(habits: &[Habit], date: NaiveDate) -> HabitStats {
    HabitStats {
        habit_count: habits.len(),
        done_today: habits.iter().filter(|h| h.is_done_on(date)).count(),
        best_streak: habits.iter().map(|h| h.longest_streak).max().unwrap_or(0),
        total_completions: habits.iter().map(|h| h.completed).sum(),
    }
}
