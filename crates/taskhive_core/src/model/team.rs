//! Team domain model.

use crate::model::worker::WorkerId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a team.
pub type TeamId = Uuid;

/// Named group of worker members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub uuid: TeamId,
    pub name: String,
    /// Sorted, duplicate-free member ids.
    pub members: Vec<WorkerId>,
}

/// Persist-ready team payload produced by a validated team form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeam {
    pub name: String,
    pub members: Vec<WorkerId>,
}
