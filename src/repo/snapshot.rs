use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use crate::db::{KeyValueStore, StorageResult};
use crate::models::{Stage, Task, TaskId};

/// Record shape of the stage-keyed layout, where the key carries the status
#[derive(Debug, Deserialize)]
struct StageKeyedRecord {
    id: TaskId,
    title: String,
    #[serde(default)]
    description: String,
}

/// Reads and writes the whole task list under one storage key
pub struct SnapshotRepo;

impl SnapshotRepo {
    /// Load the task list, falling back to an empty list on any failure
    pub fn load<S: KeyValueStore + ?Sized>(kv: &S, key: &str) -> Vec<Task> {
        let raw = match kv.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::debug!("No snapshot stored under '{}'", key);
                return Vec::new();
            }
            Err(e) => {
                log::warn!("Failed to read snapshot '{}': {}", key, e);
                return Vec::new();
            }
        };

        match Self::decode(&raw) {
            Ok(tasks) => {
                log::debug!("Loaded {} tasks from '{}'", tasks.len(), key);
                tasks
            }
            Err(e) => {
                log::warn!("Failed to parse snapshot '{}', starting empty: {}", key, e);
                Vec::new()
            }
        }
    }

    /// Overwrite the stored snapshot with the given list
    pub fn save<S: KeyValueStore + ?Sized>(kv: &mut S, key: &str, tasks: &[Task]) -> StorageResult<()> {
        let json = Self::encode(tasks)?;
        kv.set(key, &json)?;
        log::debug!("Saved {} tasks to '{}'", tasks.len(), key);
        Ok(())
    }

    pub fn encode(tasks: &[Task]) -> Result<String, serde_json::Error> {
        serde_json::to_string(tasks)
    }

    /// Decode a snapshot.
    ///
    /// Accepts the list layout (`[{id, title, description, status}]`) and the
    /// stage-keyed layout (`{"stories": [{id, title, description}], ...}`).
    /// Records that do not parse are dropped; a repeated id keeps its first
    /// occurrence.
    pub fn decode(raw: &str) -> Result<Vec<Task>, serde_json::Error> {
        let value: Value = serde_json::from_str(raw)?;
        let mut seen = HashSet::new();
        let mut tasks = Vec::new();

        match value {
            Value::Array(records) => {
                for record in records {
                    match serde_json::from_value::<Task>(record) {
                        Ok(task) => push_unique(&mut tasks, &mut seen, task),
                        Err(e) => log::warn!("Dropping unreadable task record: {}", e),
                    }
                }
            }
            Value::Object(mut columns) => {
                let mut stage_keys: Vec<(Stage, String)> = columns
                    .keys()
                    .filter_map(|k| match Stage::from_id(k) {
                        Some(stage) => Some((stage, k.clone())),
                        None => {
                            log::warn!("Dropping tasks under unknown stage '{}'", k);
                            None
                        }
                    })
                    .collect();
                stage_keys.sort();

                for (stage, key) in stage_keys {
                    let Some(Value::Array(records)) = columns.remove(&key) else {
                        log::warn!("Stage '{}' does not hold a list of tasks", key);
                        continue;
                    };
                    for record in records {
                        match serde_json::from_value::<StageKeyedRecord>(record) {
                            Ok(r) => {
                                let task = Task {
                                    id: r.id,
                                    title: r.title,
                                    description: r.description,
                                    status: stage,
                                };
                                push_unique(&mut tasks, &mut seen, task);
                            }
                            Err(e) => log::warn!("Dropping unreadable task record: {}", e),
                        }
                    }
                }
            }
            other => {
                return Err(serde::de::Error::custom(format!(
                    "expected a task list, found {}",
                    json_kind(&other)
                )));
            }
        }

        Ok(tasks)
    }
}

fn push_unique(tasks: &mut Vec<Task>, seen: &mut HashSet<TaskId>, task: Task) {
    // Ids are creation timestamps; the CLI cannot address anything else
    if task.id.as_i64() <= 0 {
        log::warn!("Dropping task '{}' with non-positive id {}", task.title, task.id);
        return;
    }
    if task.title.trim().is_empty() {
        log::warn!("Dropping task {} with empty title", task.id);
        return;
    }
    if !seen.insert(task.id) {
        log::warn!("Dropping duplicate task {} in {}", task.id, task.status);
        return;
    }
    tasks.push(task);
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryKv, StorageError};

    const KEY: &str = "kanbanTasks";

    fn sample() -> Vec<Task> {
        vec![
            Task::new(TaskId(1), "Write spec".to_string(), "draft v1".to_string()),
            Task {
                id: TaskId(2),
                title: "Ship".to_string(),
                description: String::new(),
                status: Stage::Done,
            },
        ]
    }

    #[test]
    fn test_save_then_load_recovers_board() {
        let mut kv = MemoryKv::new();
        SnapshotRepo::save(&mut kv, KEY, &sample()).unwrap();
        assert_eq!(SnapshotRepo::load(&kv, KEY), sample());
    }

    #[test]
    fn test_load_missing_key_is_empty() {
        let kv = MemoryKv::new();
        assert!(SnapshotRepo::load(&kv, KEY).is_empty());
    }

    #[test]
    fn test_load_malformed_is_empty() {
        let mut kv = MemoryKv::new();
        kv.set(KEY, "{not json").unwrap();
        assert!(SnapshotRepo::load(&kv, KEY).is_empty());

        kv.set(KEY, "42").unwrap();
        assert!(SnapshotRepo::load(&kv, KEY).is_empty());
    }

    #[test]
    fn test_load_read_failure_is_empty() {
        struct Broken;
        impl KeyValueStore for Broken {
            fn get(&self, _key: &str) -> StorageResult<Option<String>> {
                Err(StorageError::Unavailable("disk gone".to_string()))
            }
            fn set(&mut self, _key: &str, _value: &str) -> StorageResult<()> {
                Err(StorageError::Unavailable("disk gone".to_string()))
            }
            fn remove(&mut self, _key: &str) -> StorageResult<()> {
                Ok(())
            }
        }
        assert!(SnapshotRepo::load(&Broken, KEY).is_empty());
    }

    #[test]
    fn test_decode_drops_bad_records() {
        let raw = r#"[
            {"id": 1, "title": "ok", "description": "", "status": "stories"},
            {"id": 2, "title": "bad stage", "description": "", "status": "archived"},
            {"id": 1, "title": "dup", "description": "", "status": "done"},
            {"id": 3, "title": "  ", "description": "", "status": "done"}
        ]"#;
        let tasks = SnapshotRepo::decode(raw).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "ok");
    }

    #[test]
    fn test_decode_drops_non_positive_ids() {
        let raw = r#"[
            {"id": "0", "title": "zero", "status": "stories"},
            {"id": -4, "title": "negative", "status": "done"},
            {"id": "1", "title": "one", "status": "stories"}
        ]"#;
        let tasks = SnapshotRepo::decode(raw).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, TaskId(1));

        let legacy = r#"{"stories": [{"id": 0, "title": "zero"}, {"id": 2, "title": "two"}]}"#;
        let tasks = SnapshotRepo::decode(legacy).unwrap();
        assert_eq!(tasks.iter().map(|t| t.id).collect::<Vec<_>>(), vec![TaskId(2)]);
    }

    #[test]
    fn test_decode_stage_keyed_layout() {
        let raw = r#"{
            "done": [{"id": 3, "title": "C", "description": "c"}],
            "stories": [{"id": 1, "title": "A", "description": "a"}],
            "in progress": [{"id": 2, "title": "B"}, {"id": 1, "title": "A again"}],
            "someday": [{"id": 9, "title": "Z"}]
        }"#;
        let tasks = SnapshotRepo::decode(raw).unwrap();
        let summary: Vec<(i64, Stage)> = tasks.iter().map(|t| (t.id.0, t.status)).collect();
        assert_eq!(
            summary,
            vec![(1, Stage::Stories), (2, Stage::InProgress), (3, Stage::Done)]
        );
        assert_eq!(tasks[1].description, "");
    }
}
