//! Catalog records referenced by workers and tasks.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a position record.
pub type PositionId = Uuid;

/// Stable identifier for a task type record.
pub type TaskTypeId = Uuid;

/// Named job category assignable to workers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub uuid: PositionId,
    pub name: String,
}

/// Named category assignable to tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskType {
    pub uuid: TaskTypeId,
    pub name: String,
}
