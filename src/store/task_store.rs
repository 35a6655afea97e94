use super::ids::{system_clock, Clock, IdGenerator};
use super::{load_collection, save_collection, seed, Loaded};
use crate::domain::views::{self, TaskInsights};
use crate::domain::{
    CategoryFilter, HabitSummary, NewHabitSummary, NewTask, Subtask, Task, TaskUpdate,
};
use crate::persistence::PersistQueue;
use chrono::{DateTime, Local, NaiveDate};
use log::{debug, info};
use std::sync::Arc;

pub const TASKS_KEY: &str = "tasks";
pub const TASK_HABITS_KEY: &str = "taskHabits";

/// Everything the task store keeps in memory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskState {
    /// Most recent first
    pub tasks: Vec<Task>,
    pub habits: Vec<HabitSummary>,
    pub current_filter: CategoryFilter,
}

/// Intents the task store understands
#[derive(Debug, Clone, PartialEq)]
pub enum TaskAction {
    LoadTasks(Vec<Task>),
    LoadHabits(Vec<HabitSummary>),
    AddTask(Task),
    ToggleTask(String),
    DeleteTask(String),
    UpdateTask { id: String, updates: TaskUpdate },
    UpdateSubtasks { task_id: String, subtasks: Vec<Subtask> },
    ToggleSubtask { task_id: String, subtask_id: u64 },
    SetFilter(CategoryFilter),
    AddHabit(HabitSummary),
}

/// Persisted collection an action wrote to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Touched {
    Nothing,
    Tasks,
    Habits,
}

impl TaskState {
    /// Apply one action. Unknown ids are ignored, but the collection still counts as written.
    pub fn reduce(&mut self, action: TaskAction) -> Touched {
        match action {
            TaskAction::LoadTasks(tasks) => {
                self.tasks = tasks;
                Touched::Nothing
            }
            TaskAction::LoadHabits(habits) => {
                self.habits = habits;
                Touched::Nothing
            }
            TaskAction::AddTask(task) => {
                self.tasks.insert(0, task);
                Touched::Tasks
            }
            TaskAction::ToggleTask(id) => {
                if let Some(task) = self.find_mut(&id) {
                    task.toggle();
                }
                Touched::Tasks
            }
            TaskAction::DeleteTask(id) => {
                self.tasks.retain(|t| t.id != id);
                Touched::Tasks
            }
            TaskAction::UpdateTask { id, updates } => {
                if let Some(task) = self.find_mut(&id) {
                    updates.apply_to(task);
                }
                Touched::Tasks
            }
            TaskAction::UpdateSubtasks { task_id, subtasks } => {
                if let Some(task) = self.find_mut(&task_id) {
                    task.subtasks = subtasks;
                }
                Touched::Tasks
            }
            TaskAction::ToggleSubtask { task_id, subtask_id } => {
                if let Some(task) = self.find_mut(&task_id) {
                    task.toggle_subtask(subtask_id);
                }
                Touched::Tasks
            }
            TaskAction::SetFilter(filter) => {
                self.current_filter = filter;
                Touched::Nothing
            }
            TaskAction::AddHabit(habit) => {
                self.habits.push(habit);
                Touched::Habits
            }
        }
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }
}

/// Owner of the flat task collection and the category-grouped habit list
pub struct TaskStore {
    state: TaskState,
    persist: Arc<PersistQueue>,
    clock: Clock,
    ids: IdGenerator,
}

impl TaskStore {
    pub fn open(persist: Arc<PersistQueue>) -> Self {
        Self::open_with_clock(persist, system_clock)
    }

    /// Load saved state, seeding sample data for collections never saved before
    pub fn open_with_clock(persist: Arc<PersistQueue>, clock: Clock) -> Self {
        let mut store = Self {
            state: TaskState::default(),
            persist,
            clock,
            ids: IdGenerator::default(),
        };
        store.load();
        store
    }

    fn load(&mut self) {
        let now = (self.clock)();

        match load_collection::<Task>(&self.persist, TASKS_KEY) {
            Loaded::Found(tasks) => {
                self.state.reduce(TaskAction::LoadTasks(tasks));
            }
            Loaded::Missing => {
                info!("event=store_seed module=store key={}", TASKS_KEY);
                self.state.reduce(TaskAction::LoadTasks(seed::sample_tasks(now)));
                self.save_tasks();
            }
            Loaded::Failed => {
                self.state.reduce(TaskAction::LoadTasks(Vec::new()));
            }
        }

        match load_collection::<HabitSummary>(&self.persist, TASK_HABITS_KEY) {
            Loaded::Found(habits) => {
                self.state.reduce(TaskAction::LoadHabits(habits));
            }
            Loaded::Missing => {
                info!("event=store_seed module=store key={}", TASK_HABITS_KEY);
                self.state
                    .reduce(TaskAction::LoadHabits(seed::sample_habit_summaries(now)));
                self.save_habits();
            }
            Loaded::Failed => {
                self.state.reduce(TaskAction::LoadHabits(Vec::new()));
            }
        }

        self.ids = IdGenerator::above(
            self.state
                .tasks
                .iter()
                .map(|t| t.id.as_str())
                .chain(self.state.habits.iter().map(|h| h.id.as_str())),
        );
    }

    /// Run an action and queue a save of whatever it wrote
    pub fn dispatch(&mut self, action: TaskAction) {
        match self.state.reduce(action) {
            Touched::Tasks => self.save_tasks(),
            Touched::Habits => self.save_habits(),
            Touched::Nothing => {}
        }
    }

    fn save_tasks(&self) {
        debug!("event=tasks_changed module=store count={}", self.state.tasks.len());
        save_collection(&self.persist, TASKS_KEY, &self.state.tasks);
    }

    fn save_habits(&self) {
        save_collection(&self.persist, TASK_HABITS_KEY, &self.state.habits);
    }

    pub fn now(&self) -> DateTime<Local> {
        (self.clock)()
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Create a task at the top of the list and return its id
    pub fn add_task(&mut self, data: NewTask) -> String {
        let now = (self.clock)();
        let id = self.ids.next(now);
        self.dispatch(TaskAction::AddTask(Task::from_new(id.clone(), now, data)));
        id
    }

    pub fn toggle_task(&mut self, id: &str) {
        self.dispatch(TaskAction::ToggleTask(id.to_string()));
    }

    pub fn delete_task(&mut self, id: &str) {
        self.dispatch(TaskAction::DeleteTask(id.to_string()));
    }

    pub fn update_task(&mut self, id: &str, updates: TaskUpdate) {
        self.dispatch(TaskAction::UpdateTask {
            id: id.to_string(),
            updates,
        });
    }

    pub fn update_subtasks(&mut self, task_id: &str, subtasks: Vec<Subtask>) {
        self.dispatch(TaskAction::UpdateSubtasks {
            task_id: task_id.to_string(),
            subtasks,
        });
    }

    pub fn toggle_subtask(&mut self, task_id: &str, subtask_id: u64) {
        self.dispatch(TaskAction::ToggleSubtask {
            task_id: task_id.to_string(),
            subtask_id,
        });
    }

    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.dispatch(TaskAction::SetFilter(filter));
    }

    /// Append a category-grouped habit and return its id
    pub fn add_habit(&mut self, data: NewHabitSummary) -> String {
        let now = (self.clock)();
        let id = self.ids.next(now);
        self.dispatch(TaskAction::AddHabit(HabitSummary {
            id: id.clone(),
            title: data.title,
            category: data.category,
            icon: data.icon,
            color: data.color,
            tasks: Vec::new(),
            created_at: now,
        }));
        id
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn habits(&self) -> &[HabitSummary] {
        &self.state.habits
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.state.tasks.iter().find(|t| t.id == id)
    }

    pub fn current_filter(&self) -> CategoryFilter {
        self.state.current_filter
    }

    pub fn filtered_tasks(&self) -> Vec<&Task> {
        views::filter_by_category(&self.state.tasks, self.state.current_filter)
    }

    /// Open non-habit tasks from any day
    pub fn open_tasks(&self) -> Vec<&Task> {
        views::open_tasks(&self.state.tasks)
    }

    /// Completed non-habit tasks from any day
    pub fn completed_tasks(&self) -> Vec<&Task> {
        views::completed_tasks(&self.state.tasks)
    }

    pub fn task_insights(&self) -> TaskInsights {
        views::task_insights(&self.state.tasks, self.today())
    }

    pub fn habits_by_category(&self, category: &str) -> Vec<&HabitSummary> {
        views::habits_in_category(&self.state.habits, category)
    }

    pub fn habit_tasks(&self, habit_id: &str) -> Vec<&Task> {
        views::habit_tasks(&self.state.tasks, habit_id)
    }

    pub fn tasks_by_date(&self, date: NaiveDate) -> Vec<&Task> {
        views::tasks_on(&self.state.tasks, date)
    }
}
