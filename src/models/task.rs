use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::models::Stage;

/// Task identifier
///
/// Derived from the creation time in milliseconds since the Unix epoch. The
/// board guarantees uniqueness; callers should treat the value as opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl TaskId {
    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// Creation time encoded in the id
    pub fn created_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp_millis(self.0)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(TaskId)
    }
}

// Older snapshots stored ids as strings ("1700000000000"), so accept both.
impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TaskIdVisitor;

        impl<'de> Visitor<'de> for TaskIdVisitor {
            type Value = TaskId;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an integer task id or a numeric string")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<TaskId, E> {
                Ok(TaskId(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<TaskId, E> {
                i64::try_from(v)
                    .map(TaskId)
                    .map_err(|_| E::custom(format!("task id out of range: {}", v)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<TaskId, E> {
                if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
                    Ok(TaskId(v as i64))
                } else {
                    Err(E::custom(format!("task id is not an integer: {}", v)))
                }
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<TaskId, E> {
                v.parse::<TaskId>()
                    .map_err(|_| E::custom(format!("invalid task id: '{}'", v)))
            }
        }

        deserializer.deserialize_any(TaskIdVisitor)
    }
}

/// Task model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Stage,
}

impl Task {
    /// Create a new task in the first stage
    pub fn new(id: TaskId, title: String, description: String) -> Self {
        Self {
            id,
            title,
            description,
            status: Stage::first(),
        }
    }

    /// Deletion is offered only while the task is still a story
    pub fn is_deletable(&self) -> bool {
        self.status.is_first()
    }
}
