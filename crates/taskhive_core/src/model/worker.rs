//! Worker domain model.
//!
//! # Responsibility
//! - Define the worker account record exposed to read paths.
//! - Define the persist-ready payload produced by worker creation.
//!
//! # Invariants
//! - `username` is unique across all workers.
//! - Every worker references exactly one existing position.
//! - Password material never appears on the read model.

use crate::model::catalog::PositionId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a worker account.
pub type WorkerId = Uuid;

/// Worker account as read back from storage.
///
/// The stored password never appears here; it is write-only through
/// [`NewWorker`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub uuid: WorkerId,
    pub username: String,
    /// May be empty; first/last names are optional at signup.
    pub first_name: String,
    /// May be empty; first/last names are optional at signup.
    pub last_name: String,
    pub position: PositionId,
}

impl Worker {
    /// Returns `first_name last_name` with surrounding whitespace trimmed.
    ///
    /// Falls back to an empty string when both name parts are empty.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Persist-ready worker payload produced by a validated creation form.
///
/// Carries the raw password exactly as submitted; hashing is owned by the
/// credential storage path, not by form validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorker {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub position: PositionId,
}
