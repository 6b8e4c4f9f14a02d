//! Project domain model.
//!
//! # Responsibility
//! - Define the project record and its status lifecycle values.
//! - Define the persist-ready payload produced by the project form.
//!
//! # Invariants
//! - `status` holds exactly one of the values in [`ProjectStatus::ALL`].
//! - `teams` is sorted and free of duplicates.

use crate::model::team::TeamId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a project.
pub type ProjectId = Uuid;

/// Project lifecycle state.
///
/// Stored and submitted as the snake_case strings returned by
/// [`ProjectStatus::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Scoped but not started.
    Planned,
    /// Work is in progress.
    InProgress,
    /// All work finished.
    Completed,
}

impl ProjectStatus {
    /// All selectable statuses, in presentation order.
    pub const ALL: [ProjectStatus; 3] = [
        ProjectStatus::Planned,
        ProjectStatus::InProgress,
        ProjectStatus::Completed,
    ];

    /// Returns the canonical storage/form value for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Parses a submitted or stored status value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "planned" => Some(Self::Planned),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Unit of work grouping several teams under one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub uuid: ProjectId,
    pub name: String,
    pub status: ProjectStatus,
    pub teams: Vec<TeamId>,
}

impl Project {
    /// Returns whether this project has reached its terminal status.
    pub fn is_completed(&self) -> bool {
        self.status == ProjectStatus::Completed
    }
}

/// Persist-ready project payload produced by a validated project form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub status: ProjectStatus,
    pub teams: Vec<TeamId>,
}
