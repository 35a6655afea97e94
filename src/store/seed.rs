//! Sample data loaded when nothing has been saved yet.

use crate::domain::{Category, Habit, HabitSummary, HabitTask, Priority, Subtask, Task};
use chrono::{DateTime, Duration, Local};

fn steps(items: &[(&str, bool)]) -> Vec<Subtask> {
    items
        .iter()
        .enumerate()
        .map(|(i, (text, completed))| Subtask {
            id: i as u64 + 1,
            text: text.to_string(),
            completed: *completed,
        })
        .collect()
}

struct SampleTask<'a> {
    id: &'a str,
    title: &'a str,
    category: Category,
    priority: Priority,
    time: &'a str,
    description: &'a str,
}

impl SampleTask<'_> {
    fn build(self, created_at: DateTime<Local>, completed: bool, habit_id: Option<&str>, subtasks: Vec<Subtask>) -> Task {
        Task {
            id: self.id.to_string(),
            title: self.title.to_string(),
            category: self.category,
            completed,
            priority: self.priority,
            time: Some(self.time.to_string()),
            description: self.description.to_string(),
            habit_id: habit_id.map(str::to_string),
            subtasks,
            created_at,
        }
    }
}

/// Regular tasks followed by the tasks owned by the sample habits
pub fn sample_tasks(now: DateTime<Local>) -> Vec<Task> {
    let days_ago = |days: i64| now - Duration::days(days);

    let mut tasks = vec![
        SampleTask {
            id: "1",
            title: "Create project make to do app",
            category: Category::Work,
            priority: Priority::High,
            time: "9:00 - 17:00",
            description: "Develop a comprehensive todo application",
        }
        .build(
            now,
            false,
            None,
            steps(&[
                ("Plan app structure and features", true),
                ("Set up development environment", true),
                ("Create user interface design", false),
                ("Implement task management functionality", false),
                ("Add dark mode support", false),
                ("Test and debug the application", false),
            ]),
        ),
        SampleTask {
            id: "2",
            title: "Complete sociology assignment",
            category: Category::Education,
            priority: Priority::High,
            time: "14:00 - 18:00",
            description: "Finish sociology research paper",
        }
        .build(
            now,
            false,
            None,
            steps(&[
                ("Research topic and gather sources", true),
                ("Create outline and structure", false),
                ("Write introduction and thesis", false),
                ("Develop main arguments", false),
                ("Write conclusion and references", false),
                ("Proofread and final review", false),
            ]),
        ),
        SampleTask {
            id: "3",
            title: "Press uniform",
            category: Category::Personal,
            priority: Priority::Medium,
            time: "19:00 - 20:00",
            description: "Iron and prepare work uniform",
        }
        .build(
            now,
            false,
            None,
            steps(&[
                ("Sort clothes by type", false),
                ("Set up ironing board", false),
                ("Iron shirts and pants", false),
                ("Hang clothes properly", false),
                ("Check for any wrinkles", false),
            ]),
        ),
        SampleTask {
            id: "4",
            title: "Read books",
            category: Category::Personal,
            priority: Priority::Medium,
            time: "21:00 - 22:00",
            description: "Daily reading session",
        }
        .build(
            now,
            false,
            None,
            steps(&[
                ("Choose book to read", true),
                ("Find comfortable reading spot", false),
                ("Read for 30 minutes", false),
                ("Take notes on key points", false),
                ("Update reading progress", false),
            ]),
        ),
    ];

    // (id, title, category, priority, time, description, habit, completed, days ago)
    let habit_rows: [(&str, &str, Category, Priority, &str, &str, &str, bool, i64); 11] = [
        ("habit-task-1", "Morning yoga with stretching", Category::Health, Priority::Medium, "9:00", "Morning yoga session", "habit1", false, 0),
        ("habit-task-2", "Relaxing bedtime meditation", Category::Health, Priority::Medium, "21:00", "Evening meditation", "habit1", false, 0),
        ("habit-task-3", "Mindful breathing exercise", Category::Health, Priority::Low, "15:00", "5-minute breathing exercise", "habit1", true, 1),
        ("habit-task-4", "Drink 8 glasses of water", Category::Health, Priority::High, "All day", "Stay hydrated", "habit2", true, 1),
        ("habit-task-5", "Morning hydration routine", Category::Health, Priority::High, "7:00", "Drink 2 glasses of water", "habit2", false, 0),
        ("habit-task-6", "Evening water intake", Category::Health, Priority::Medium, "19:00", "Drink 1 glass before dinner", "habit2", false, 0),
        ("habit-task-7", "Set bedtime alarm", Category::Health, Priority::Medium, "22:00", "Prepare for 8-hour sleep", "habit3", false, 0),
        ("habit-task-8", "No screen time before bed", Category::Health, Priority::High, "21:30", "Avoid screens 30 minutes before sleep", "habit3", true, 2),
        ("habit-task-9", "Morning cardio session", Category::Sport, Priority::High, "6:30", "30-minute cardio workout", "habit4", false, 0),
        ("habit-task-10", "Strength training", Category::Sport, Priority::High, "18:00", "Upper body strength training", "habit4", true, 3),
        ("habit-task-11", "Post-workout stretching", Category::Sport, Priority::Medium, "19:00", "15-minute stretching routine", "habit4", false, 0),
    ];

    tasks.extend(habit_rows.into_iter().map(
        |(id, title, category, priority, time, description, habit, completed, age)| {
            SampleTask {
                id,
                title,
                category,
                priority,
                time,
                description,
            }
            .build(days_ago(age), completed, Some(habit), Vec::new())
        },
    ));

    tasks
}

/// Category-grouped habits that own the sample habit tasks
pub fn sample_habit_summaries(now: DateTime<Local>) -> Vec<HabitSummary> {
    [
        ("habit1", "Meditation", "Mindfulness", "leaf", "#06B6D4"),
        ("habit2", "Drink water", "Health", "water", "#3B82F6"),
        ("habit3", "Sleep 8 hours daily", "Health", "moon", "#1E40AF"),
        ("habit4", "Gym workouts", "Fitness", "fitness", "#F59E0B"),
    ]
    .into_iter()
    .map(|(id, title, category, icon, color)| HabitSummary {
        id: id.to_string(),
        title: title.to_string(),
        category: category.to_string(),
        icon: icon.to_string(),
        color: color.to_string(),
        tasks: Vec::new(),
        created_at: now,
    })
    .collect()
}

fn habit_tasks(now: DateTime<Local>, items: &[(&str, &str, &str)]) -> Vec<HabitTask> {
    items
        .iter()
        .map(|(id, title, time)| HabitTask {
            id: id.to_string(),
            title: title.to_string(),
            time: time.to_string(),
            completed: false,
            created_at: now,
        })
        .collect()
}

/// Tracked habits with streak history
pub fn sample_habits(now: DateTime<Local>) -> Vec<Habit> {
    let habit = |id: &str,
                 title: &str,
                 description: &str,
                 icon: &str,
                 color: &str,
                 (goal, completed, streak, longest_streak): (u32, u32, u32, u32),
                 weekly_progress: [bool; 7],
                 tasks: Vec<HabitTask>| Habit {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        color: color.to_string(),
        goal,
        completed,
        streak,
        longest_streak,
        weekly_progress,
        tasks,
        created_at: now,
    };

    vec![
        habit(
            "1",
            "Meditation",
            "Daily meditation practice",
            "meditation",
            "#8B5CF6",
            (40, 10, 3, 6),
            [true, true, true, true, false, false, false],
            habit_tasks(now, &[
                ("1-1", "Morning yoga with stretching", "9:00"),
                ("1-2", "Relaxing bedtime meditation", "21:00"),
            ]),
        ),
        habit(
            "2",
            "Drink water",
            "Stay hydrated throughout the day",
            "water",
            "#3B82F6",
            (34, 10, 2, 5),
            [true, true, false, false, false, false, false],
            habit_tasks(now, &[("2-1", "Drink 8 glasses of water", "Throughout the day")]),
        ),
        habit(
            "3",
            "Sleep 8 hours daily",
            "Maintain healthy sleep schedule",
            "sleep",
            "#6366F1",
            (56, 50, 7, 12),
            [true; 7],
            habit_tasks(now, &[
                ("3-1", "Go to bed by 10 PM", "22:00"),
                ("3-2", "Wake up at 6 AM", "06:00"),
            ]),
        ),
        habit(
            "4",
            "Gym workouts",
            "Regular exercise routine",
            "fitness",
            "#F59E0B",
            (120, 15, 1, 8),
            [false; 7],
            habit_tasks(now, &[
                ("4-1", "Cardio workout", "18:00"),
                ("4-2", "Strength training", "19:00"),
            ]),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_sample_task_ids_are_unique() {
        let tasks = sample_tasks(now());
        let ids: HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(tasks.len(), 15);
        assert_eq!(ids.len(), tasks.len());
    }

    #[test]
    fn test_sample_habit_tasks_reference_summaries() {
        let summaries = sample_habit_summaries(now());
        let known: HashSet<&str> = summaries.iter().map(|h| h.id.as_str()).collect();

        for task in sample_tasks(now()) {
            if let Some(habit_id) = &task.habit_id {
                assert!(known.contains(habit_id.as_str()), "dangling {}", habit_id);
            }
        }
    }

    #[test]
    fn test_sample_habits_streaks_are_consistent() {
        for habit in sample_habits(now()) {
            assert!(habit.longest_streak >= habit.streak, "{}", habit.title);
        }
    }
}
