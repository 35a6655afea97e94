use crate::domain::views::{rounded_percent, task_insights};
use crate::domain::{Habit, Task};
use crate::persistence::files::atomic_write;
use crate::report::stats::{calculate_category_stats, calculate_habit_stats, calculate_habit_task_stats};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;
use std::path::{Path, PathBuf};

/// Format percentage with 1 decimal place
fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

fn ratio_percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Markdown summary of tasks and habits for one day
pub fn render_report(date: NaiveDate, tasks: &[Task], habits: &[Habit]) -> String {
    let insights = task_insights(tasks, date);
    let categories = calculate_category_stats(tasks, date);
    let habit_tasks = calculate_habit_task_stats(tasks, date);
    let habit_stats = calculate_habit_stats(habits, date);

    let mut report = String::new();

    // Header
    report.push_str(&format!("# Daily Report - {}\n\n", date));

    // Summary Section
    report.push_str("## Summary\n\n");
    report.push_str(&format!(
        "- **Tasks Created:** {} (Done: {}, Open: {})\n",
        insights.total,
        insights.completed,
        insights.total - insights.completed
    ));
    report.push_str(&format!("- **Completion Rate:** {}%\n", insights.completion_rate));
    report.push_str(&format!(
        "- **Habit Tasks:** {}/{} done\n",
        habit_tasks.completed, habit_tasks.total
    ));
    report.push_str(&format!(
        "- **Habits Done Today:** {}/{}\n\n",
        habit_stats.done_today, habit_stats.habit_count
    ));

    // Category Section
    if !categories.is_empty() {
        report.push_str("## Categories\n\n");
        for stats in &categories {
            report.push_str(&format!(
                "- **{}:** {}/{} done ({})\n",
                stats.category,
                stats.completed,
                stats.total,
                format_percent(ratio_percent(stats.completed, stats.total))
            ));
        }
        report.push('\n');
    }

    // Habits Section
    if !habits.is_empty() {
        report.push_str("## Habits\n\n");
        report.push_str(&format!(
            "- **Best Streak:** {} days\n- **Total Completions:** {}\n\n",
            habit_stats.best_streak, habit_stats.total_completions
        ));
        report.push_str("| Habit | Streak | Longest | Progress | Week (S-S) |\n");
        report.push_str("|---|---|---|---|---|\n");
        for habit in habits {
            report.push_str(&format!(
                "| {} | {} | {} | {}/{} ({}%) | {} |\n",
                habit.title,
                habit.streak,
                habit.longest_streak,
                habit.completed,
                habit.goal,
                habit.goal_percent(),
                habit.week_strip()
            ));
        }
        report.push('\n');
    }

    // Tasks Breakdown Section
    let day_tasks: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.created_on(date) && !t.is_habit_task())
        .collect();
    if !day_tasks.is_empty() {
        report.push_str("## Tasks\n\n");
        for task in day_tasks {
            let mark = if task.completed { "x" } else { " " };
            report.push_str(&format!(
                "- [{}] **{}** ({}, {})\n",
                mark, task.title, task.category, task.priority
            ));
            let (done, total) = task.subtask_progress();
            if total > 0 {
                report.push_str(&format!(
                    "  - Steps: {}/{} ({}%)\n",
                    done,
                    total,
                    rounded_percent(done, total)
                ));
            }
        }
        report.push('\n');
    }

    report
}

/// Write the report for `date`, by default to `<data_dir>/report-YYYY-MM-DD.md`
pub fn generate_report(
    date: NaiveDate,
    tasks: &[Task],
    habits: &[Habit],
    data_dir: &Path,
    output_path: Option<PathBuf>,
) -> Result<PathBuf> {
    let report = render_report(date, tasks, habits);
    let output = output_path.unwrap_or_else(|| data_dir.join(format!("report-{}.md", date)));

    atomic_write(&output, &report)
        .with_context(|| format!("Failed to write report: {}", output.display()))?;
    info!("event=report_written module=report status=ok date={}", date);

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, NewHabit, NewTask, Subtask};
    use chrono::{DateTime, Local, TimeZone};
    use tempfile::TempDir;

    fn at(day: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, day, 10, 0, 0).unwrap()
    }

    fn sample() -> (Vec<Task>, Vec<Habit>) {
        let mut report = Task::from_new(
            "1".to_string(),
            at(16),
            NewTask {
                subtasks: vec![Subtask::new(1, "Draft"), Subtask::new(2, "Send")],
                ..NewTask::new("Quarterly report").category(Category::Work)
            },
        );
        report.toggle_subtask(1);
        let mut walk = Task::from_new("2".to_string(), at(16), NewTask::new("Walk"));
        walk.toggle();
        let old = Task::from_new("3".to_string(), at(14), NewTask::new("Old errand"));

        let mut read = Habit::from_new("h1".to_string(), at(1), NewHabit::new("Read"));
        read.mark_complete(at(16).date_naive());

        (vec![report, walk, old], vec![read])
    }

    #[test]
    fn test_render_report_sections() {
        let (tasks, habits) = sample();
        let report = render_report(at(16).date_naive(), &tasks, &habits);

        assert!(report.starts_with("# Daily Report - 2026-10-16\n"));
        assert!(report.contains("- **Tasks Created:** 2 (Done: 1, Open: 1)"));
        assert!(report.contains("- **Completion Rate:** 50%"));
        assert!(report.contains("- **Personal:** 1/1 done (100.0%)"));
        assert!(report.contains("- **Work:** 0/1 done (0.0%)"));
        assert!(report.contains("| Read | 1 | 1 | 1/30 (3%) | □□□□□■□ |"));
        assert!(report.contains("- [ ] **Quarterly report** (Work, medium)"));
        assert!(report.contains("  - Steps: 1/2 (50%)"));
        assert!(!report.contains("Old errand"));
    }

    #[test]
    fn test_render_report_empty_day() {
        let report = render_report(at(16).date_naive(), &[], &[]);
        assert!(report.contains("- **Completion Rate:** 0%"));
        assert!(!report.contains("## Categories"));
        assert!(!report.contains("## Habits"));
    }

    #[test]
    fn test_generate_report_default_path() {
        let temp = TempDir::new().unwrap();
        let (tasks, habits) = sample();

        let path = generate_report(at(16).date_naive(), &tasks, &habits, temp.path(), None).unwrap();

        assert_eq!(path, temp.path().join("report-2026-10-16.md"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("## Habits"));
    }
}
