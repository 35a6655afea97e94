use crate::cli::{BoardCommand, Commands, HabitCommand, HabitFields, StepCommand, TaskChanges, TaskFields, ThemeCommand};
use crate::domain::views::{self, WeekDay};
use crate::domain::{
    next_subtask_id, prune_blank_subtasks, Habit, HabitUpdate, NewHabit, NewHabitSummary,
    NewHabitTask, NewTask, Subtask, Task, TaskUpdate,
};
use crate::persistence::{ensure_data_dir, load_preferences, toggle_dark_mode, FileStore, KeyValueStore, PersistQueue};
use crate::report;
use crate::store::{system_clock, Clock, HabitStore, TaskStore, STORAGE_KEYS};
use anyhow::{anyhow, bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use log::{info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Both stores plus the write queue they share, opened once per invocation
pub struct Session {
    pub tasks: TaskStore,
    pub habits: HabitStore,
    pub persist: Arc<PersistQueue>,
    pub data_dir: PathBuf,
}

impl Session {
    pub fn open(data_dir_override: Option<&Path>) -> Result<Self> {
        let data_dir = ensure_data_dir(data_dir_override)?;
        let backend = Arc::new(FileStore::new(&data_dir, &STORAGE_KEYS));
        Self::with_backend(backend, data_dir, system_clock)
    }

    pub fn with_backend(backend: Arc<dyn KeyValueStore>, data_dir: PathBuf, clock: Clock) -> Result<Self> {
        let persist = Arc::new(PersistQueue::start(backend).context("Failed to start storage")?);
        let tasks = TaskStore::open_with_clock(persist.clone(), clock);
        let habits = HabitStore::open_with_clock(persist.clone(), clock);
        Ok(Self {
            tasks,
            habits,
            persist,
            data_dir,
        })
    }

    /// Wait for every queued write. Failed writes were already logged one by one.
    pub fn close(&self) {
        self.persist.flush();
        let failed = self.persist.failed_writes();
        if failed > 0 {
            warn!("event=session_close module=commands status=degraded failed_writes={}", failed);
        }
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| anyhow!("Invalid date format. Use YYYY-MM-DD: {}", e))
}

fn parse_month(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", value.trim()), "%Y-%m-%d")
        .map_err(|e| anyhow!("Invalid month format. Use YYYY-MM: {}", e))
}

fn require_title(title: &str, what: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        bail!("{} title cannot be empty", what);
    }
    Ok(title.to_string())
}

fn require_task<'a>(store: &'a TaskStore, id: &str) -> Result<&'a Task> {
    store.task(id).with_context(|| format!("No task with id {}", id))
}

fn require_habit<'a>(store: &'a HabitStore, id: &str) -> Result<&'a Habit> {
    store.habit(id).with_context(|| format!("No habit with id {}", id))
}

fn require_habit_task(store: &HabitStore, habit_id: &str, task_id: &str) -> Result<()> {
    let habit = require_habit(store, habit_id)?;
    if !habit.tasks.iter().any(|t| t.id == task_id) {
        bail!("Habit {} has no task {}", habit_id, task_id);
    }
    Ok(())
}

fn format_task(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    let mut line = format!("[{}] {}  {} ({}, {})", mark, task.id, task.title, task.category, task.priority);
    if let Some(time) = &task.time {
        line.push_str(&format!("  {}", time));
    }
    let (done, total) = task.subtask_progress();
    if total > 0 {
        line.push_str(&format!("  {}/{} steps", done, total));
    }
    line
}

fn format_habit(habit: &Habit) -> String {
    format!(
        "{}  {}  streak {} (best {})  {}/{} ({}%)  {}",
        habit.id,
        habit.title,
        habit.streak,
        habit.longest_streak,
        habit.completed,
        habit.goal,
        habit.goal_percent(),
        habit.week_strip()
    )
}

fn write_tasks<'a>(out: &mut impl Write, tasks: impl IntoIterator<Item = &'a Task>) -> Result<()> {
    let mut any = false;
    for task in tasks {
        writeln!(out, "{}", format_task(task))?;
        any = true;
    }
    if !any {
        writeln!(out, "No tasks")?;
    }
    Ok(())
}

fn write_habits(out: &mut impl Write, habits: &[&Habit]) -> Result<()> {
    if habits.is_empty() {
        writeln!(out, "No habits")?;
    }
    for habit in habits {
        writeln!(out, "{}", format_habit(habit))?;
    }
    Ok(())
}

fn write_week(out: &mut impl Write, week: &[WeekDay], status: impl Fn(NaiveDate) -> &'static str) -> Result<()> {
    for day in week {
        let today = if day.is_today { "  <- today" } else { "" };
        writeln!(out, "{} {:>2} {}{}", day.label, day.day_of_month, status(day.date), today)?;
    }
    Ok(())
}

fn build_subtasks(texts: Vec<String>, now: chrono::DateTime<chrono::Local>) -> Vec<Subtask> {
    let mut subtasks: Vec<Subtask> = Vec::new();
    for text in texts {
        let id = next_subtask_id(&subtasks, now);
        subtasks.push(Subtask::new(id, text.trim()));
    }
    prune_blank_subtasks(subtasks)
}

fn add_task(session: &mut Session, fields: TaskFields, out: &mut impl Write) -> Result<()> {
    let title = require_title(&fields.title, "Task")?;
    let subtasks = build_subtasks(fields.steps, session.tasks.now());
    let id = session.tasks.add_task(NewTask {
        title,
        category: fields.category,
        priority: fields.priority,
        time: fields.time,
        description: fields.description,
        habit_id: fields.habit,
        subtasks,
    });
    writeln!(out, "Added task {}", id)?;
    Ok(())
}

fn edit_task(session: &mut Session, id: &str, changes: TaskChanges, out: &mut impl Write) -> Result<()> {
    require_task(&session.tasks, id)?;
    let title = match changes.title {
        Some(title) => Some(require_title(&title, "Task")?),
        None => None,
    };
    let time = if changes.clear_time {
        Some(None)
    } else {
        changes.time.map(Some)
    };
    let habit_id = if changes.no_habit {
        Some(None)
    } else {
        changes.habit.map(Some)
    };
    let updates = TaskUpdate {
        title,
        category: changes.category,
        completed: changes.completed,
        priority: changes.priority,
        time,
        description: changes.description,
        habit_id,
    };
    if updates.is_empty() {
        writeln!(out, "Nothing to change")?;
        return Ok(());
    }
    session.tasks.update_task(id, updates);
    writeln!(out, "Updated task {}", id)?;
    Ok(())
}

fn run_steps(session: &mut Session, task_id: &str, action: StepCommand, out: &mut impl Write) -> Result<()> {
    let mut subtasks = require_task(&session.tasks, task_id)?.subtasks.clone();

    match action {
        StepCommand::Add { text } => {
            let id = next_subtask_id(&subtasks, session.tasks.now());
            subtasks.push(Subtask::new(id, text.trim()));
            let subtasks = prune_blank_subtasks(subtasks);
            let added = subtasks.iter().any(|s| s.id == id);
            session.tasks.update_subtasks(task_id, subtasks);
            if added {
                writeln!(out, "Added step {}", id)?;
            } else {
                writeln!(out, "Ignored blank step")?;
            }
        }
        StepCommand::Remove { step } => {
            let before = subtasks.len();
            subtasks.retain(|s| s.id != step);
            if subtasks.len() == before {
                bail!("Task {} has no step {}", task_id, step);
            }
            session.tasks.update_subtasks(task_id, prune_blank_subtasks(subtasks));
            writeln!(out, "Removed step {}", step)?;
        }
        StepCommand::Toggle { step } => {
            if !subtasks.iter().any(|s| s.id == step) {
                bail!("Task {} has no step {}", task_id, step);
            }
            session.tasks.toggle_subtask(task_id, step);
            writeln!(out, "Toggled step {}", step)?;
        }
    }

    if let Some(task) = session.tasks.task(task_id) {
        for step in &task.subtasks {
            let mark = if step.completed { "x" } else { " " };
            writeln!(out, "  [{}] {}  {}", mark, step.id, step.text)?;
        }
    }
    Ok(())
}

fn write_month(session: &Session, date: Option<String>, out: &mut impl Write) -> Result<()> {
    let first = match date {
        Some(value) => parse_month(&value)?,
        None => session.tasks.today().with_day(1).context("Invalid current date")?,
    };
    let cells = views::month_grid(first.year(), first.month())
        .with_context(|| format!("Invalid month {}", first.format("%Y-%m")))?;

    writeln!(out, "{}", first.format("%B %Y"))?;
    writeln!(out, "Su  Mo  Tu  We  Th  Fr  Sa")?;
    for week in cells.chunks(7) {
        let row: Vec<String> = week
            .iter()
            .map(|cell| match cell {
                Some(day) => {
                    let status = views::day_status(session.tasks.tasks(), *day, None);
                    format!("{:>2}{}", day.day(), status.marker())
                }
                None => "   ".to_string(),
            })
            .collect();
        writeln!(out, "{}", row.join(" ").trim_end())?;
    }
    Ok(())
}

fn run_board(session: &mut Session, action: BoardCommand, out: &mut impl Write) -> Result<()> {
    match action {
        BoardCommand::Add {
            title,
            category,
            icon,
            color,
        } => {
            let title = require_title(&title, "Habit")?;
            let id = session.tasks.add_habit(NewHabitSummary {
                title,
                category,
                icon,
                color,
            });
            writeln!(out, "Added habit {}", id)?;
        }
        BoardCommand::List { category } => {
            let habits = match &category {
                Some(category) => session.tasks.habits_by_category(category),
                None => session.tasks.habits().iter().collect(),
            };
            if habits.is_empty() {
                writeln!(out, "No habits")?;
            }
            for habit in habits {
                let tasks = session.tasks.habit_tasks(&habit.id);
                writeln!(
                    out,
                    "{}  {} [{}]  {:.0}% of {} tasks",
                    habit.id,
                    habit.title,
                    habit.category,
                    views::habit_progress(&tasks),
                    tasks.len()
                )?;
            }
        }
        BoardCommand::Tasks { habit } => {
            write_tasks(out, session.tasks.habit_tasks(&habit))?;
        }
    }
    Ok(())
}

fn habit_update(
    title: Option<String>,
    fields: HabitFields,
    streak: Option<u32>,
    reset_week: bool,
) -> Result<HabitUpdate> {
    let title = match title {
        Some(title) => Some(require_title(&title, "Habit")?),
        None => None,
    };
    Ok(HabitUpdate {
        title,
        description: fields.description,
        icon: fields.icon,
        color: fields.color,
        goal: fields.goal,
        streak,
        weekly_progress: reset_week.then_some([false; 7]),
    })
}

fn run_habit(session: &mut Session, action: HabitCommand, out: &mut impl Write) -> Result<()> {
    match action {
        HabitCommand::Add { title, fields } => {
            let title = require_title(&title, "Habit")?;
            let id = session.habits.add_habit(NewHabit {
                title,
                description: fields.description,
                icon: fields.icon,
                color: fields.color,
                goal: fields.goal,
                tasks: Vec::new(),
            });
            writeln!(out, "Added habit {}", id)?;
        }
        HabitCommand::Edit {
            id,
            title,
            fields,
            streak,
            reset_week,
        } => {
            require_habit(&session.habits, &id)?;
            let updates = habit_update(title, fields, streak, reset_week)?;
            if updates.is_empty() {
                writeln!(out, "Nothing to change")?;
            } else {
                session.habits.update_habit(&id, updates);
                writeln!(out, "Updated habit {}", id)?;
            }
        }
        HabitCommand::Delete { id } => {
            require_habit(&session.habits, &id)?;
            session.habits.delete_habit(&id);
            writeln!(out, "Deleted habit {}", id)?;
        }
        HabitCommand::Complete { id } => {
            require_habit(&session.habits, &id)?;
            session.habits.mark_habit_complete(&id);
            let habit = require_habit(&session.habits, &id)?;
            writeln!(out, "{}", format_habit(habit))?;
        }
        HabitCommand::List => {
            let habits: Vec<&Habit> = session.habits.habits().iter().collect();
            write_habits(out, &habits)?;
        }
        HabitCommand::Pending => write_habits(out, &session.habits.pending_today())?,
        HabitCommand::Completed => write_habits(out, &session.habits.completed_today())?,
        HabitCommand::Week => {
            let habits = session.habits.habits();
            write_week(out, &session.habits.weekly_progress(), |date| {
                let done = habits.iter().filter(|h| h.is_done_on(date)).count();
                if habits.is_empty() || done == 0 {
                    "·"
                } else if done == habits.len() {
                    "●"
                } else {
                    "◐"
                }
            })?;
        }
        HabitCommand::TaskAdd { habit, title, time } => {
            require_habit(&session.habits, &habit)?;
            let title = require_title(&title, "Task")?;
            let id = session.habits.add_habit_task(&habit, NewHabitTask { title, time });
            writeln!(out, "Added habit task {}", id)?;
        }
        HabitCommand::TaskToggle { habit, task } => {
            require_habit_task(&session.habits, &habit, &task)?;
            session.habits.toggle_habit_task(&habit, &task);
            writeln!(out, "Toggled habit task {}", task)?;
        }
        HabitCommand::TaskDelete { habit, task } => {
            require_habit_task(&session.habits, &habit, &task)?;
            session.habits.delete_habit_task(&habit, &task);
            writeln!(out, "Deleted habit task {}", task)?;
        }
    }
    Ok(())
}

/// Run one command against an open session
pub fn execute(session: &mut Session, command: Commands, out: &mut impl Write) -> Result<()> {
    match command {
        Commands::Init => bail!("init runs before a data directory is opened"),
        Commands::Add(fields) => add_task(session, fields, out)?,
        Commands::List { filter } => {
            session.tasks.set_filter(filter);
            writeln!(out, "Filter: {}", session.tasks.current_filter())?;
            write_tasks(out, session.tasks.filtered_tasks())?;
        }
        Commands::Open => write_tasks(out, session.tasks.open_tasks())?,
        Commands::Done => write_tasks(out, session.tasks.completed_tasks())?,
        Commands::Toggle { id } => {
            require_task(&session.tasks, &id)?;
            session.tasks.toggle_task(&id);
            let task = require_task(&session.tasks, &id)?;
            writeln!(out, "{}", format_task(task))?;
        }
        Commands::Edit { id, changes } => edit_task(session, &id, changes, out)?,
        Commands::Delete { id } => {
            require_task(&session.tasks, &id)?;
            session.tasks.delete_task(&id);
            writeln!(out, "Deleted task {}", id)?;
        }
        Commands::Steps { task, action } => run_steps(session, &task, action, out)?,
        Commands::Insights => {
            let insights = session.tasks.task_insights();
            writeln!(
                out,
                "Today: {}/{} tasks done ({}%)",
                insights.completed, insights.total, insights.completion_rate
            )?;
        }
        Commands::On { date } => {
            let date = parse_date(&date)?;
            write_tasks(out, session.tasks.tasks_by_date(date))?;
        }
        Commands::Week { habit } => {
            let tasks = session.tasks.tasks();
            let week = views::current_week(session.tasks.today());
            write_week(out, &week, |date| views::day_status(tasks, date, habit.as_deref()).marker())?;
        }
        Commands::Month { date } => write_month(session, date, out)?,
        Commands::Board { action } => run_board(session, action, out)?,
        Commands::Habit { action } => run_habit(session, action, out)?,
        Commands::Theme { action } => {
            let preferences = match action {
                Some(ThemeCommand::Toggle) => toggle_dark_mode(&session.persist),
                None => load_preferences(&session.persist),
            };
            writeln!(out, "Dark mode: {}", if preferences.dark_mode { "on" } else { "off" })?;
        }
        Commands::Report { date, output } => {
            let date = match date {
                Some(value) => parse_date(&value)?,
                None => session.tasks.today(),
            };
            let path = report::generate_report(
                date,
                session.tasks.tasks(),
                session.habits.habits(),
                &session.data_dir,
                output,
            )?;
            writeln!(out, "Report generated: {}", path.display())?;
        }
        Commands::Reset => {
            session.persist.clear();
            info!("event=reset module=commands status=queued");
            writeln!(out, "Cleared all data in {}", session.data_dir.display())?;
        }
    }
    Ok(())
}
