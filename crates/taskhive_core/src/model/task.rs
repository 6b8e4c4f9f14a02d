//! Task domain model.
//!
//! # Responsibility
//! - Define the task record with its deadline and assignee set.
//! - Define the persist-ready payload produced by the task form.
//!
//! # Invariants
//! - `deadline` is stored and compared in UTC.
//! - `assignees` is sorted and free of duplicates.

use crate::model::catalog::TaskTypeId;
use crate::model::worker::WorkerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a task.
pub type TaskId = Uuid;

/// Unit of work with a deadline, completion flag and assigned workers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub uuid: TaskId,
    pub name: String,
    pub deadline: DateTime<Utc>,
    pub is_completed: bool,
    pub task_type: TaskTypeId,
    pub assignees: Vec<WorkerId>,
}

impl Task {
    /// Returns whether this task is past its deadline and still open.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_completed && self.deadline < now
    }
}

/// Persist-ready task payload produced by a validated task form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    pub deadline: DateTime<Utc>,
    pub is_completed: bool,
    pub task_type: TaskTypeId,
    pub assignees: Vec<WorkerId>,
}
