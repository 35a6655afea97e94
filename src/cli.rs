use crate::domain::{Category, CategoryFilter, Priority};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "habitual")]
#[command(about = "A local task and habit tracker with category filters, streaks and daily insights", long_about = None)]
pub struct Cli {
    /// Use this data directory instead of a local .habitual or ~/.habitual
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level for <data_dir>/logs (trace, debug, info, warn, error, off)
    #[arg(long, global = true, default_value = crate::logging::DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a local .habitual directory in the current directory
    Init,
    /// Add a task
    Add(TaskFields),
    /// List tasks, optionally for one category
    List {
        #[arg(short, long, default_value = "all")]
        filter: CategoryFilter,
    },
    /// Open tasks from any day
    Open,
    /// Completed tasks from any day
    Done,
    /// Flip a task between open and done
    Toggle { id: String },
    /// Change fields of a task
    Edit {
        id: String,
        #[command(flatten)]
        changes: TaskChanges,
    },
    /// Delete a task
    Delete { id: String },
    /// Manage the steps of a task
    Steps {
        task: String,
        #[command(subcommand)]
        action: StepCommand,
    },
    /// Completion rate of the tasks created today
    Insights,
    /// Tasks created on a date (YYYY-MM-DD)
    On { date: String },
    /// Status of each day of the current week
    Week {
        /// Only count the tasks of this habit
        #[arg(long)]
        habit: Option<String>,
    },
    /// Calendar of a month with a status marker per day
    Month {
        /// Month to show (YYYY-MM). Defaults to the current month.
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Category-grouped habits and their tasks
    Board {
        #[command(subcommand)]
        action: BoardCommand,
    },
    /// Tracked habits with streaks
    Habit {
        #[command(subcommand)]
        action: HabitCommand,
    },
    /// Show or toggle dark mode
    Theme {
        #[command(subcommand)]
        action: Option<ThemeCommand>,
    },
    /// Generate a daily report
    Report {
        /// Date to generate report for (YYYY-MM-DD format). Defaults to today.
        #[arg(short, long)]
        date: Option<String>,
        /// Output file path. Defaults to <data_dir>/report-YYYY-MM-DD.md
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delete all stored data; sample data is loaded on the next run
    Reset,
}

#[derive(Args, Debug, Clone)]
pub struct TaskFields {
    pub title: String,
    #[arg(short, long)]
    pub category: Option<Category>,
    #[arg(short, long)]
    pub priority: Option<Priority>,
    /// Free text, e.g. "9:00 - 10:00"
    #[arg(short, long)]
    pub time: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    /// Attach the task to a board habit
    #[arg(long)]
    pub habit: Option<String>,
    /// Add a step; repeat for more
    #[arg(short, long = "step")]
    pub steps: Vec<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct TaskChanges {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub category: Option<Category>,
    #[arg(short, long)]
    pub priority: Option<Priority>,
    #[arg(short, long, conflicts_with = "clear_time")]
    pub time: Option<String>,
    #[arg(long)]
    pub clear_time: bool,
    #[arg(short, long)]
    pub description: Option<String>,
    /// Set the done state directly (true or false)
    #[arg(long)]
    pub completed: Option<bool>,
    /// Attach the task to a board habit
    #[arg(long, conflicts_with = "no_habit")]
    pub habit: Option<String>,
    /// Detach the task from its board habit
    #[arg(long)]
    pub no_habit: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum StepCommand {
    Add { text: String },
    Remove { step: u64 },
    Toggle { step: u64 },
}

#[derive(Subcommand, Debug, Clone)]
pub enum BoardCommand {
    /// Add a habit to the board
    Add {
        title: String,
        #[arg(short, long, default_value = "Health")]
        category: String,
        #[arg(long, default_value = crate::domain::habit::DEFAULT_HABIT_ICON)]
        icon: String,
        #[arg(long, default_value = crate::domain::habit::DEFAULT_HABIT_COLOR)]
        color: String,
    },
    /// List board habits, optionally for one category
    List {
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Tasks attached to a board habit
    Tasks { habit: String },
}

#[derive(Args, Debug, Clone, Default)]
pub struct HabitFields {
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(long)]
    pub icon: Option<String>,
    #[arg(long)]
    pub color: Option<String>,
    /// Target number of completions
    #[arg(short, long)]
    pub goal: Option<u32>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum HabitCommand {
    Add {
        title: String,
        #[command(flatten)]
        fields: HabitFields,
    },
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: HabitFields,
        /// Overwrite the current streak
        #[arg(long)]
        streak: Option<u32>,
        /// Clear every day of the weekly progress
        #[arg(long)]
        reset_week: bool,
    },
    Delete { id: String },
    /// Count a completion for today
    Complete { id: String },
    List,
    /// Habits not yet done today
    Pending,
    /// Habits done today
    Completed,
    /// Days of the current week
    Week,
    TaskAdd {
        habit: String,
        title: String,
        #[arg(short, long)]
        time: Option<String>,
    },
    TaskToggle { habit: String, task: String },
    TaskDelete { habit: String, task: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ThemeCommand {
    Toggle,
}
