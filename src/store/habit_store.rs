use super::ids::{system_clock, Clock, IdGenerator};
use super::{load_collection, save_collection, seed, Loaded};
use crate::domain::views::{self, WeekDay};
use crate::domain::{Habit, HabitTask, HabitUpdate, NewHabit, NewHabitTask};
use crate::persistence::PersistQueue;
use chrono::NaiveDate;
use log::info;
use std::sync::Arc;

pub const HABITS_KEY: &str = "habits";

/// Intents the habit store understands
#[derive(Debug, Clone, PartialEq)]
pub enum HabitAction {
    Load(Vec<Habit>),
    Add(Habit),
    Update { id: String, updates: HabitUpdate },
    Delete(String),
    /// Completion is recorded against the weekday slot of `date`
    MarkComplete { id: String, date: NaiveDate },
    AddTask { habit_id: String, task: HabitTask },
    ToggleTask { habit_id: String, task_id: String },
    DeleteTask { habit_id: String, task_id: String },
}

/// Apply one action to the habit list. Returns whether the list should be saved.
pub fn reduce(habits: &mut Vec<Habit>, action: HabitAction) -> bool {
    fn find<'a>(habits: &'a mut [Habit], id: &str) -> Option<&'a mut Habit> {
        habits.iter_mut().find(|h| h.id == id)
    }

    match action {
        HabitAction::Load(loaded) => {
            *habits = loaded;
            return false;
        }
        HabitAction::Add(habit) => habits.insert(0, habit),
        HabitAction::Update { id, updates } => {
            if let Some(habit) = find(habits, &id) {
                updates.apply_to(habit);
            }
        }
        HabitAction::Delete(id) => habits.retain(|h| h.id != id),
        HabitAction::MarkComplete { id, date } => {
            if let Some(habit) = find(habits, &id) {
                habit.mark_complete(date);
            }
        }
        HabitAction::AddTask { habit_id, task } => {
            if let Some(habit) = find(habits, &habit_id) {
                habit.tasks.push(task);
            }
        }
        HabitAction::ToggleTask { habit_id, task_id } => {
            if let Some(habit) = find(habits, &habit_id) {
                habit.toggle_task(&task_id);
            }
        }
        HabitAction::DeleteTask { habit_id, task_id } => {
            if let Some(habit) = find(habits, &habit_id) {
                habit.remove_task(&task_id);
            }
        }
    }
    true
}

/// Owner of the tracked habits (streaks, weekly progress, embedded tasks)
pub struct HabitStore {
    habits: Vec<Habit>,
    persist: Arc<PersistQueue>,
    clock: Clock,
    ids: IdGenerator,
}

impl HabitStore {
    pub fn open(persist: Arc<PersistQueue>) -> Self {
        Self::open_with_clock(persist, system_clock)
    }

    /// Load saved habits, or the sample habits when none were ever saved
    pub fn open_with_clock(persist: Arc<PersistQueue>, clock: Clock) -> Self {
        let mut store = Self {
            habits: Vec::new(),
            persist,
            clock,
            ids: IdGenerator::default(),
        };

        let loaded = match load_collection::<Habit>(&store.persist, HABITS_KEY) {
            Loaded::Found(habits) => habits,
            Loaded::Missing => {
                info!("event=store_seed module=store key={}", HABITS_KEY);
                let habits = seed::sample_habits((store.clock)());
                save_collection(&store.persist, HABITS_KEY, &habits);
                habits
            }
            Loaded::Failed => Vec::new(),
        };
        reduce(&mut store.habits, HabitAction::Load(loaded));

        store.ids = IdGenerator::above(
            store.habits.iter().flat_map(|h| {
                std::iter::once(h.id.as_str()).chain(h.tasks.iter().map(|t| t.id.as_str()))
            }),
        );
        store
    }

    pub fn dispatch(&mut self, action: HabitAction) {
        if reduce(&mut self.habits, action) {
            save_collection(&self.persist, HABITS_KEY, &self.habits);
        }
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)().date_naive()
    }

    /// Create a habit at the top of the list and return its id
    pub fn add_habit(&mut self, data: NewHabit) -> String {
        let now = (self.clock)();
        let id = self.ids.next(now);
        self.dispatch(HabitAction::Add(Habit::from_new(id.clone(), now, data)));
        id
    }

    pub fn update_habit(&mut self, id: &str, updates: HabitUpdate) {
        self.dispatch(HabitAction::Update {
            id: id.to_string(),
            updates,
        });
    }

    pub fn delete_habit(&mut self, id: &str) {
        self.dispatch(HabitAction::Delete(id.to_string()));
    }

    /// Count a completion for today. Not guarded against repeats on the same day.
    pub fn mark_habit_complete(&mut self, id: &str) {
        let date = self.today();
        self.dispatch(HabitAction::MarkComplete {
            id: id.to_string(),
            date,
        });
    }

    /// Append a task to a habit; returns the new task id even if the habit is missing
    pub fn add_habit_task(&mut self, habit_id: &str, data: NewHabitTask) -> String {
        let now = (self.clock)();
        let id = self.ids.next(now);
        self.dispatch(HabitAction::AddTask {
            habit_id: habit_id.to_string(),
            task: HabitTask {
                id: id.clone(),
                title: data.title,
                time: data.time.unwrap_or_default(),
                completed: false,
                created_at: now,
            },
        });
        id
    }

    pub fn toggle_habit_task(&mut self, habit_id: &str, task_id: &str) {
        self.dispatch(HabitAction::ToggleTask {
            habit_id: habit_id.to_string(),
            task_id: task_id.to_string(),
        });
    }

    pub fn delete_habit_task(&mut self, habit_id: &str, task_id: &str) {
        self.dispatch(HabitAction::DeleteTask {
            habit_id: habit_id.to_string(),
            task_id: task_id.to_string(),
        });
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn habit(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    /// Habits not yet marked for today's weekday
    pub fn pending_today(&self) -> Vec<&Habit> {
        views::pending_habits(&self.habits, self.today())
    }

    /// Habits already marked for today's weekday
    pub fn completed_today(&self) -> Vec<&Habit> {
        views::completed_habits(&self.habits, self.today())
    }

    pub fn weekly_progress(&self) -> Vec<WeekDay> {
        views::current_week(self.today())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::kv::MemoryStore;
    use chrono::{DateTime, Local, TimeZone};
    use pretty_assertions::assert_eq;

    /// A Friday, weekday slot 5
    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap()
    }

    fn empty_store() -> (HabitStore, Arc<MemoryStore>, Arc<PersistQueue>) {
        let backend = Arc::new(MemoryStore::with_entry(HABITS_KEY, "[]"));
        let queue = Arc::new(PersistQueue::start(backend.clone()).unwrap());
        let store = HabitStore::open_with_clock(queue.clone(), fixed_now);
        (store, backend, queue)
    }

    fn saved_habits(backend: &MemoryStore, queue: &PersistQueue) -> Vec<Habit> {
        queue.flush();
        serde_json::from_str(&backend.get(HABITS_KEY).unwrap()).unwrap()
    }

    #[test]
    fn test_add_habit_defaults_and_prepends() {
        let (mut store, _, _) = empty_store();
        let first = store.add_habit(NewHabit::new("Read"));
        let second = store.add_habit(NewHabit {
            goal: Some(12),
            color: Some("#000000".to_string()),
            ..NewHabit::new("Run")
        });

        assert_eq!(store.habits()[0].id, second);
        assert_eq!(store.habits()[1].id, first);

        let read = store.habit(&first).unwrap();
        assert_eq!(read.goal, 30);
        assert_eq!(read.icon, "fitness");
        assert_eq!(read.weekly_progress, [false; 7]);

        let run = store.habit(&second).unwrap();
        assert_eq!(run.goal, 12);
        assert_eq!(run.color, "#000000");
    }

    #[test]
    fn test_update_and_delete() {
        let (mut store, _, _) = empty_store();
        let id = store.add_habit(NewHabit::new("Read"));

        store.update_habit(
            &id,
            HabitUpdate {
                title: Some("Read more".to_string()),
                goal: Some(60),
                ..HabitUpdate::default()
            },
        );
        let habit = store.habit(&id).unwrap();
        assert_eq!(habit.title, "Read more");
        assert_eq!(habit.goal, 60);
        assert_eq!(habit.icon, "fitness");

        store.update_habit("missing", HabitUpdate::default());
        store.delete_habit("missing");
        assert_eq!(store.habits().len(), 1);

        store.delete_habit(&id);
        assert!(store.habits().is_empty());
    }

    #[test]
    fn test_mark_complete_sets_today_slot() {
        let (mut store, _, _) = empty_store();
        let id = store.add_habit(NewHabit::new("Read"));

        store.mark_habit_complete(&id);

        let habit = store.habit(&id).unwrap();
        assert_eq!(habit.completed, 1);
        assert_eq!(habit.streak, 1);
        assert_eq!(habit.longest_streak, 1);
        assert_eq!(
            habit.weekly_progress,
            [false, false, false, false, false, true, false]
        );
    }

    #[test]
    fn test_mark_complete_twice_same_day_double_counts() {
        let (mut store, _, _) = empty_store();
        let id = store.add_habit(NewHabit::new("Read"));

        store.mark_habit_complete(&id);
        store.mark_habit_complete(&id);

        let habit = store.habit(&id).unwrap();
        assert_eq!(habit.completed, 2);
        assert_eq!(habit.streak, 2);
        assert_eq!(habit.longest_streak, 2);
    }

    #[test]
    fn test_pending_and_completed_today() {
        let (mut store, _, _) = empty_store();
        let done = store.add_habit(NewHabit::new("Read"));
        let open = store.add_habit(NewHabit::new("Run"));
        store.mark_habit_complete(&done);

        let pending: Vec<&str> = store.pending_today().iter().map(|h| h.id.as_str()).collect();
        let completed: Vec<&str> = store.completed_today().iter().map(|h| h.id.as_str()).collect();
        assert_eq!(pending, vec![open.as_str()]);
        assert_eq!(completed, vec![done.as_str()]);
    }

    #[test]
    fn test_habit_task_crud() {
        let (mut store, _, _) = empty_store();
        let habit = store.add_habit(NewHabit::new("Sleep"));

        let bed = store.add_habit_task(
            &habit,
            NewHabitTask {
                title: "Go to bed".to_string(),
                time: Some("22:00".to_string()),
            },
        );
        let wake = store.add_habit_task(
            &habit,
            NewHabitTask {
                title: "Wake up".to_string(),
                time: None,
            },
        );

        let tasks = &store.habit(&habit).unwrap().tasks;
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, bed);
        assert_eq!(tasks[1].time, "");

        store.toggle_habit_task(&habit, &wake);
        assert!(store.habit(&habit).unwrap().tasks[1].completed);

        store.delete_habit_task(&habit, &bed);
        let tasks = &store.habit(&habit).unwrap().tasks;
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, wake);
    }

    #[test]
    fn test_habit_task_ops_ignore_unknown_habit() {
        let (mut store, _, _) = empty_store();
        let habit = store.add_habit(NewHabit::new("Sleep"));
        let before = store.habits().to_vec();

        store.add_habit_task(
            "missing",
            NewHabitTask {
                title: "x".to_string(),
                time: None,
            },
        );
        store.toggle_habit_task("missing", "1");
        store.delete_habit_task("missing", "1");

        assert_eq!(store.habits(), before.as_slice());
        assert!(store.habit(&habit).unwrap().tasks.is_empty());
    }

    #[test]
    fn test_mutations_are_persisted_and_reload() {
        let (mut store, backend, queue) = empty_store();
        let id = store.add_habit(NewHabit::new("Read"));
        store.mark_habit_complete(&id);

        assert_eq!(saved_habits(&backend, &queue), store.habits().to_vec());

        let reopened = HabitStore::open_with_clock(queue.clone(), fixed_now);
        assert_eq!(reopened.habits(), store.habits());
    }

    #[test]
    fn test_missing_storage_loads_samples() {
        let backend = Arc::new(MemoryStore::default());
        let queue = Arc::new(PersistQueue::start(backend.clone()).unwrap());
        let store = HabitStore::open_with_clock(queue.clone(), fixed_now);

        assert_eq!(store.habits().len(), 4);
        // Friday: only "Sleep 8 hours daily" has slot 5 filled
        assert_eq!(store.completed_today().len(), 1);
        assert_eq!(store.pending_today().len(), 3);
        assert_eq!(saved_habits(&backend, &queue).len(), 4);
    }

    #[test]
    fn test_corrupt_storage_loads_empty() {
        let backend = Arc::new(MemoryStore::with_entry(HABITS_KEY, "[{\"id\": 3}]"));
        let queue = Arc::new(PersistQueue::start(backend).unwrap());
        let store = HabitStore::open_with_clock(queue, fixed_now);
        assert!(store.habits().is_empty());
    }

    #[test]
    fn test_weekly_progress_marks_today() {
        let (store, _, _) = empty_store();
        let week = store.weekly_progress();
        assert_eq!(week.len(), 7);
        assert_eq!(week.iter().position(|d| d.is_today), Some(4));
    }
}
