//! Keyword search forms.
//!
//! # Responsibility
//! - Bind one optional keyword per entity and translate it into a filter.
//! - Run worker and task searches against their repositories.
//!
//! # Invariants
//! - An empty or absent keyword means no filtering at all.
//! - Search is read-only and idempotent for a fixed data set.

use crate::form::{FieldKind, FieldSchema, FormData};
use crate::model::task::Task;
use crate::model::worker::Worker;
use crate::repo::predicate::{contains_any, Predicate};
use crate::repo::task_repo::TaskRepository;
use crate::repo::worker_repo::WorkerRepository;
use crate::repo::{catalog_repo, project_repo, task_repo, team_repo, worker_repo, RepoResult};

const WORKER_KEYWORD: FieldSchema = FieldSchema {
    name: "keyword",
    kind: FieldKind::Text,
    required: false,
    placeholder: Some("Are you looking for somebody?"),
};
const TASK_KEYWORD: FieldSchema = FieldSchema {
    name: "keyword",
    kind: FieldKind::Text,
    required: false,
    placeholder: Some("Looking for task?"),
};
const POSITION_NAME: FieldSchema = FieldSchema {
    name: "name",
    kind: FieldKind::Text,
    required: false,
    placeholder: Some("Looking for position?"),
};
const TASK_TYPE_NAME: FieldSchema = FieldSchema {
    name: "name",
    kind: FieldKind::Text,
    required: false,
    placeholder: Some("Looking for task type?"),
};
const PROJECT_NAME: FieldSchema = FieldSchema {
    name: "name",
    kind: FieldKind::Text,
    required: false,
    placeholder: Some("Looking for project?"),
};
const TEAM_NAME: FieldSchema = FieldSchema {
    name: "name",
    kind: FieldKind::Text,
    required: false,
    placeholder: Some("Looking for team?"),
};

fn bound_keyword(data: &FormData, field: FieldSchema) -> String {
    data.get(field.name).map(str::trim).unwrap_or("").to_string()
}

/// Worker search over username and first/last name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerSearchForm {
    /// Optional keyword; empty means return everything.
    pub keyword: String,
}

impl WorkerSearchForm {
    /// Declared fields of this form.
    pub fn schema() -> &'static [FieldSchema] {
        &[WORKER_KEYWORD]
    }

    /// Binds the submitted `keyword` field.
    pub fn bind(data: &FormData) -> Self {
        Self {
            keyword: bound_keyword(data, WORKER_KEYWORD),
        }
    }

    /// Returns the filter for this keyword, `None` when unfiltered.
    pub fn predicate(&self) -> Option<Predicate> {
        contains_any(worker_repo::SEARCH_COLUMNS, &self.keyword)
    }

    /// Returns workers matching the keyword, all workers when empty.
    pub fn search(&self, workers: &impl WorkerRepository) -> RepoResult<Vec<Worker>> {
        workers.list_workers(self.predicate().as_ref())
    }
}

/// Task search over the task name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSearchForm {
    /// Optional keyword; empty means return everything.
    pub keyword: String,
}

impl TaskSearchForm {
    /// Declared fields of this form.
    pub fn schema() -> &'static [FieldSchema] {
        &[TASK_KEYWORD]
    }

    /// Binds the submitted `keyword` field.
    pub fn bind(data: &FormData) -> Self {
        Self {
            keyword: bound_keyword(data, TASK_KEYWORD),
        }
    }

    /// Returns the filter for this keyword, `None` when unfiltered.
    pub fn predicate(&self) -> Option<Predicate> {
        contains_any(task_repo::SEARCH_COLUMNS, &self.keyword)
    }

    /// Returns tasks matching the keyword, all tasks when empty.
    pub fn search(&self, tasks: &impl TaskRepository) -> RepoResult<Vec<Task>> {
        tasks.list_tasks(self.predicate().as_ref())
    }
}

/// Position search over the position name.
///
/// Produces a filter for the hosting layer; listing stays with the
/// catalog repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionSearchForm {
    /// Optional name fragment; empty means return everything.
    pub name: String,
}

impl PositionSearchForm {
    /// Declared fields of this form.
    pub fn schema() -> &'static [FieldSchema] {
        &[POSITION_NAME]
    }

    /// Binds the submitted `name` field.
    pub fn bind(data: &FormData) -> Self {
        Self {
            name: bound_keyword(data, POSITION_NAME),
        }
    }

    /// Returns the filter for this name fragment, `None` when unfiltered.
    pub fn predicate(&self) -> Option<Predicate> {
        contains_any(catalog_repo::SEARCH_COLUMNS, &self.name)
    }
}

/// Task type search over the task type name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskTypeSearchForm {
    /// Optional name fragment; empty means return everything.
    pub name: String,
}

impl TaskTypeSearchForm {
    /// Declared fields of this form.
    pub fn schema() -> &'static [FieldSchema] {
        &[TASK_TYPE_NAME]
    }

    /// Binds the submitted `name` field.
    pub fn bind(data: &FormData) -> Self {
        Self {
            name: bound_keyword(data, TASK_TYPE_NAME),
        }
    }

    /// Returns the filter for this name fragment, `None` when unfiltered.
    pub fn predicate(&self) -> Option<Predicate> {
        contains_any(catalog_repo::SEARCH_COLUMNS, &self.name)
    }
}

/// Project search over the project name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectSearchForm {
    /// Optional name fragment; empty means return everything.
    pub name: String,
}

impl ProjectSearchForm {
    /// Declared fields of this form.
    pub fn schema() -> &'static [FieldSchema] {
        &[PROJECT_NAME]
    }

    /// Binds the submitted `name` field.
    pub fn bind(data: &FormData) -> Self {
        Self {
            name: bound_keyword(data, PROJECT_NAME),
        }
    }

    /// Returns the filter for this name fragment, `None` when unfiltered.
    pub fn predicate(&self) -> Option<Predicate> {
        contains_any(project_repo::SEARCH_COLUMNS, &self.name)
    }
}

/// Team search over the team name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamSearchForm {
    /// Optional name fragment; empty means return everything.
    pub name: String,
}

impl TeamSearchForm {
    /// Declared fields of this form.
    pub fn schema() -> &'static [FieldSchema] {
        &[TEAM_NAME]
    }

    /// Binds the submitted `name` field.
    pub fn bind(data: &FormData) -> Self {
        Self {
            name: bound_keyword(data, TEAM_NAME),
        }
    }

    /// Returns the filter for this name fragment, `None` when unfiltered.
    pub fn predicate(&self) -> Option<Predicate> {
        contains_any(team_repo::SEARCH_COLUMNS, &self.name)
    }
}
