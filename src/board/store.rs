use std::collections::HashSet;

use crate::db::{KeyValueStore, DEFAULT_STORAGE_KEY};
use crate::models::{Stage, Task, TaskId};
use crate::repo::SnapshotRepo;

struct Persistence {
    kv: Box<dyn KeyValueStore>,
    key: String,
}

/// Owned task board.
///
/// All mutation goes through `create_task`, `delete_task` and `move_task`.
/// When opened over a key-value store, every mutation that changes the board
/// is followed by a whole-list snapshot write. A failed write is logged and
/// otherwise ignored, so the in-memory board stays authoritative.
pub struct TaskBoard {
    tasks: Vec<Task>,
    last_id: i64,
    storage: Option<Persistence>,
}

impl Default for TaskBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskBoard {
    /// Empty board without persistence
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            last_id: 0,
            storage: None,
        }
    }

    /// Board seeded from an existing list, without persistence.
    ///
    /// Later tasks reusing an id already seen are dropped.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut seen = HashSet::new();
        let tasks: Vec<Task> = tasks
            .into_iter()
            .filter(|t| {
                let fresh = seen.insert(t.id);
                if !fresh {
                    log::warn!("Dropping duplicate task {} in {}", t.id, t.status);
                }
                fresh
            })
            .collect();
        let last_id = tasks.iter().map(|t| t.id.0).max().unwrap_or(0);
        Self {
            tasks,
            last_id,
            storage: None,
        }
    }

    /// Load the board from `kv` under `key` and keep it in sync from then on
    pub fn open(kv: Box<dyn KeyValueStore>, key: &str) -> Self {
        let tasks = SnapshotRepo::load(kv.as_ref(), key);
        let mut board = Self::from_tasks(tasks);
        board.storage = Some(Persistence {
            kv,
            key: key.to_string(),
        });
        board
    }

    /// `open` under the default storage key
    pub fn with_storage(kv: Box<dyn KeyValueStore>) -> Self {
        Self::open(kv, DEFAULT_STORAGE_KEY)
    }

    /// Detach and return the backing store, if any
    pub fn into_storage(self) -> Option<Box<dyn KeyValueStore>> {
        self.storage.map(|p| p.kv)
    }

    /// Create a task in the first stage.
    ///
    /// Returns `None` and leaves the board untouched when the title is empty
    /// or no larger id is left to hand out.
    pub fn create_task(&mut self, title: &str, description: &str) -> Option<Task> {
        if title.trim().is_empty() {
            log::debug!("Ignoring task with empty title");
            return None;
        }

        let Some(id) = self.next_id() else {
            log::warn!("No task id left after {}; task '{}' not created", self.last_id, title);
            return None;
        };
        let task = Task::new(id, title.to_string(), description.to_string());
        self.tasks.push(task.clone());
        log::debug!("Created task {} in {}", id, task.status);
        self.persist();
        Some(task)
    }

    /// Remove the task with `id`. Returns false if it was not on the board.
    pub fn delete_task(&mut self, id: TaskId) -> bool {
        let Some(pos) = self.tasks.iter().position(|t| t.id == id) else {
            return false;
        };
        let removed = self.tasks.remove(pos);
        log::debug!("Deleted task {} from {}", id, removed.status);
        self.persist();
        true
    }

    /// Reassign the status of `id`.
    ///
    /// Returns true only when the board changed: unknown ids and moves to the
    /// current stage are no-ops.
    pub fn move_task(&mut self, id: TaskId, destination: Stage) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        if task.status == destination {
            return false;
        }
        log::debug!("Moved task {} from {} to {}", id, task.status, destination);
        task.status = destination;
        self.persist();
        true
    }

    /// `move_task` with a stage identifier; an unknown identifier is a no-op
    pub fn move_task_to(&mut self, id: TaskId, destination: &str) -> bool {
        match Stage::from_id(destination) {
            Some(stage) => self.move_task(id, stage),
            None => {
                log::debug!("Ignoring move of task {} to unknown stage '{}'", id, destination);
                false
            }
        }
    }

    /// Tasks in `stage`, in insertion order
    pub fn list_by_stage(&self, stage: Stage) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.status == stage).collect()
    }

    /// Every stage paired with its tasks, in board order
    pub fn columns(&self) -> Vec<(Stage, Vec<&Task>)> {
        Stage::all()
            .iter()
            .map(|stage| (*stage, self.list_by_stage(*stage)))
            .collect()
    }

    pub fn stage_counts(&self) -> Vec<(Stage, usize)> {
        Stage::all()
            .iter()
            .map(|stage| (*stage, self.tasks.iter().filter(|t| t.status == *stage).count()))
            .collect()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.get(id).is_some()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    // Millisecond timestamp, bumped past the last issued id when the clock
    // has not moved on.
    fn next_id(&mut self) -> Option<TaskId> {
        let now = chrono::Utc::now().timestamp_millis();
        self.last_id = now.max(self.last_id.checked_add(1)?);
        Some(TaskId(self.last_id))
    }

    fn persist(&mut self) {
        if let Some(storage) = self.storage.as_mut() {
            if let Err(e) = SnapshotRepo::save(storage.kv.as_mut(), &storage.key, &self.tasks) {
                log::warn!("Failed to save board to '{}': {}", storage.key, e);
            }
        }
    }
}
