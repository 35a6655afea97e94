pub mod enums;
pub mod habit;
pub mod task;
pub mod views;

pub use enums::{Category, CategoryFilter, DayStatus, Priority};
pub use habit::{
    weekday_slot, Habit, HabitSummary, HabitTask, HabitUpdate, NewHabit, NewHabitSummary,
    NewHabitTask,
};
pub use task::{next_subtask_id, prune_blank_subtasks, NewTask, Subtask, Task, TaskUpdate};
pub use views::{TaskInsights, WeekDay};
