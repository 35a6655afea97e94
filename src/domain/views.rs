use super::enums::{CategoryFilter, DayStatus};
use super::habit::{Habit, HabitSummary};
use super::task::Task;
use chrono::{Datelike, Duration, NaiveDate};

/// Completion summary for the non-habit tasks created on one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskInsights {
    pub total: usize,
    pub completed: usize,
    /// Whole percent, 0 when there is nothing to measure
    pub completion_rate: u32,
}

/// One column of the week strip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekDay {
    pub date: NaiveDate,
    pub label: &'static str,
    pub day_of_month: u32,
    pub is_today: bool,
}

const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Round `part / whole` to a whole percentage (half rounds up)
pub fn rounded_percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

/// Tasks matching the filter, in collection order
pub fn filter_by_category(tasks: &[Task], filter: CategoryFilter) -> Vec<&Task> {
    tasks.iter().filter(|t| filter.matches(t.category)).collect()
}

/// Every open non-habit task, whatever day it was created
pub fn open_tasks(tasks: &[Task]) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|t| !t.completed && !t.is_habit_task())
        .collect()
}

/// Every completed non-habit task, whatever day it was created
pub fn completed_tasks(tasks: &[Task]) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|t| t.completed && !t.is_habit_task())
        .collect()
}

/// Completion rate of the non-habit tasks created on `today`
pub fn task_insights(tasks: &[Task], today: NaiveDate) -> TaskInsights {
    let created_today: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.created_on(today) && !t.is_habit_task())
        .collect();
    let total = created_today.len();
    let completed = created_today.iter().filter(|t| t.completed).count();

    TaskInsights {
        total,
        completed,
        completion_rate: rounded_percent(completed, total),
    }
}

/// All tasks (habit tasks included) created on the given calendar day
pub fn tasks_on(tasks: &[Task], date: NaiveDate) -> Vec<&Task> {
    tasks.iter().filter(|t| t.created_on(date)).collect()
}

pub fn habit_tasks<'a>(tasks: &'a [Task], habit_id: &str) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| t.habit_id.as_deref() == Some(habit_id))
        .collect()
}

pub fn habits_in_category<'a>(habits: &'a [HabitSummary], category: &str) -> Vec<&'a HabitSummary> {
    habits.iter().filter(|h| h.category == category).collect()
}

/// Share of a habit's tasks that are done, as a percentage
pub fn habit_progress(tasks: &[&Task]) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    let done = tasks.iter().filter(|t| t.completed).count();
    done as f64 / tasks.len() as f64 * 100.0
}

/// Habits whose slot for `today` is still empty
pub fn pending_habits(habits: &[Habit], today: NaiveDate) -> Vec<&Habit> {
    habits.iter().filter(|h| !h.is_done_on(today)).collect()
}

/// Habits whose slot for `today` is filled
pub fn completed_habits(habits: &[Habit], today: NaiveDate) -> Vec<&Habit> {
    habits.iter().filter(|h| h.is_done_on(today)).collect()
}

/// Seven days starting at `today - weekday + 1` (Monday, or the next Monday on a Sunday)
pub fn current_week(today: NaiveDate) -> Vec<WeekDay> {
    let offset = today.weekday().num_days_from_sunday() as i64;
    let start = today - Duration::days(offset) + Duration::days(1);

    (0..7)
        .map(|i| {
            let date = start + Duration::days(i);
            WeekDay {
                date,
                label: WEEKDAY_LABELS[date.weekday().num_days_from_sunday() as usize],
                day_of_month: date.day(),
                is_today: date == today,
            }
        })
        .collect()
}

/// How far the tasks created on `date` have progressed, optionally for one habit
pub fn day_status(tasks: &[Task], date: NaiveDate, habit_id: Option<&str>) -> DayStatus {
    let day_tasks: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.created_on(date))
        .filter(|t| habit_id.map_or(true, |id| t.habit_id.as_deref() == Some(id)))
        .collect();

    if day_tasks.is_empty() {
        return DayStatus::NoTasks;
    }

    let done = day_tasks.iter().filter(|t| t.completed).count();
    if done == day_tasks.len() {
        DayStatus::Complete
    } else if done > 0 {
        DayStatus::Partial
    } else {
        DayStatus::Pending
    }
}

/// Calendar cells for a month: blanks up to the weekday of the 1st (Sunday first),
/// then one cell per day. `None` for an invalid year/month.
pub fn month_grid(year: i32, month: u32) -> Option<Vec<Option<NaiveDate>>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let days_in_month = (next_first - first).num_days();
    let leading = first.weekday().num_days_from_sunday() as usize;

    let mut cells: Vec<Option<NaiveDate>> = vec![None; leading];
    cells.extend((0..days_in_month).map(|d| Some(first + Duration::days(d))));
    Some(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enums::Category;
    use crate::domain::habit::NewHabit;
    use crate::domain::task::NewTask;
    use chrono::{DateTime, Local, TimeZone};
    use pretty_assertions::assert_eq;

    fn at(day: u32, hour: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, day, hour, 0, 0).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
    }

    fn task(id: &str, created: DateTime<Local>, category: Category) -> Task {
        Task::from_new(id.to_string(), created, NewTask::new(id).category(category))
    }

    fn habit_task(id: &str, created: DateTime<Local>, habit: &str) -> Task {
        Task::from_new(id.to_string(), created, NewTask::new(id).habit(habit))
    }

    #[test]
    fn test_filter_preserves_order() {
        let tasks = vec![
            task("a", at(16, 9), Category::Work),
            task("b", at(16, 9), Category::Personal),
            task("c", at(16, 9), Category::Work),
        ];

        let all: Vec<&str> = filter_by_category(&tasks, CategoryFilter::All)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(all, vec!["a", "b", "c"]);

        let work: Vec<&str> = filter_by_category(&tasks, CategoryFilter::Only(Category::Work))
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(work, vec!["a", "c"]);
    }

    #[test]
    fn test_open_and_completed_skip_habit_tasks() {
        let mut done = task("done", at(1, 9), Category::Work);
        done.completed = true;
        let mut habit_done = habit_task("hd", at(16, 9), "habit1");
        habit_done.completed = true;
        let tasks = vec![
            task("open", at(1, 9), Category::Work),
            done,
            habit_task("ho", at(16, 9), "habit1"),
            habit_done,
        ];

        let open: Vec<&str> = open_tasks(&tasks).iter().map(|t| t.id.as_str()).collect();
        let completed: Vec<&str> = completed_tasks(&tasks).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(open, vec!["open"]);
        assert_eq!(completed, vec!["done"]);
    }

    #[test]
    fn test_insights_empty_day() {
        let tasks = vec![task("old", at(1, 9), Category::Work)];
        assert_eq!(
            task_insights(&tasks, date(16)),
            TaskInsights {
                total: 0,
                completed: 0,
                completion_rate: 0
            }
        );
    }

    #[test]
    fn test_insights_rounds_rate() {
        let mut first = task("1", at(16, 8), Category::Work);
        first.completed = true;
        let tasks = vec![
            first,
            task("2", at(16, 9), Category::Work),
            task("3", at(16, 23), Category::Personal),
            task("yesterday", at(15, 9), Category::Work),
            habit_task("h", at(16, 9), "habit1"),
        ];

        let insights = task_insights(&tasks, date(16));
        assert_eq!(insights.total, 3);
        assert_eq!(insights.completed, 1);
        assert_eq!(insights.completion_rate, 33);
    }

    #[test]
    fn test_insights_rounds_half_up() {
        let mut a = task("a", at(16, 8), Category::Work);
        a.completed = true;
        let b = task("b", at(16, 8), Category::Work);
        let mut c = task("c", at(16, 8), Category::Work);
        c.completed = true;
        let tasks = vec![a, b, c];
        // 2 of 3 = 66.67
        assert_eq!(task_insights(&tasks, date(16)).completion_rate, 67);
    }

    #[test]
    fn test_tasks_on_ignores_time_of_day() {
        let tasks = vec![
            task("morning", at(16, 0), Category::Work),
            task("night", at(16, 23), Category::Work),
            task("other", at(17, 0), Category::Work),
            habit_task("habit", at(16, 12), "habit1"),
        ];
        let ids: Vec<&str> = tasks_on(&tasks, date(16)).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["morning", "night", "habit"]);
    }

    #[test]
    fn test_habit_tasks_and_progress() {
        let mut done = habit_task("a", at(16, 9), "habit1");
        done.completed = true;
        let tasks = vec![
            done,
            habit_task("b", at(16, 9), "habit1"),
            habit_task("c", at(16, 9), "habit2"),
        ];
        let owned = habit_tasks(&tasks, "habit1");
        assert_eq!(owned.len(), 2);
        assert_eq!(habit_progress(&owned), 50.0);
        assert_eq!(habit_progress(&[]), 0.0);
    }

    #[test]
    fn test_pending_and_completed_habits() {
        let today = date(16);
        let mut done = Habit::from_new("1".to_string(), at(1, 9), NewHabit::new("Read"));
        done.mark_complete(today);
        let open = Habit::from_new("2".to_string(), at(1, 9), NewHabit::new("Walk"));
        let habits = vec![done, open];

        assert_eq!(pending_habits(&habits, today)[0].id, "2");
        assert_eq!(completed_habits(&habits, today)[0].id, "1");
    }

    #[test]
    fn test_current_week_starts_monday() {
        let week = current_week(date(16));
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date, date(12));
        assert_eq!(week[0].label, "Mon");
        assert_eq!(week[6].label, "Sun");
        assert!(week[4].is_today);
        assert_eq!(week.iter().filter(|d| d.is_today).count(), 1);
    }

    #[test]
    fn test_current_week_on_sunday_starts_next_day() {
        let sunday = date(18);
        let week = current_week(sunday);
        assert_eq!(week[0].date, date(19));
        assert!(week.iter().all(|d| !d.is_today));
    }

    #[test]
    fn test_day_status() {
        let mut done = task("a", at(16, 9), Category::Work);
        done.completed = true;
        let tasks = vec![
            done,
            task("b", at(16, 9), Category::Work),
            habit_task("h", at(15, 9), "habit1"),
        ];

        assert_eq!(day_status(&tasks, date(16), None), DayStatus::Partial);
        assert_eq!(day_status(&tasks, date(15), None), DayStatus::Pending);
        assert_eq!(day_status(&tasks, date(14), None), DayStatus::NoTasks);
        assert_eq!(day_status(&tasks, date(16), Some("habit1")), DayStatus::NoTasks);
    }

    #[test]
    fn test_day_status_complete() {
        let mut done = task("a", at(16, 9), Category::Work);
        done.completed = true;
        assert_eq!(day_status(&[done], date(16), None), DayStatus::Complete);
    }

    #[test]
    fn test_month_grid() {
        // October 2026 starts on a Thursday
        let cells = month_grid(2026, 10).unwrap();
        assert_eq!(cells.len(), 4 + 31);
        assert!(cells[..4].iter().all(|c| c.is_none()));
        assert_eq!(cells[4], Some(date(1)));
        assert_eq!(cells.last().copied().flatten(), Some(date(31)));

        let february = month_grid(2028, 2).unwrap();
        assert_eq!(february.iter().filter(|c| c.is_some()).count(), 29);

        assert!(month_grid(2026, 13).is_none());
    }
}
