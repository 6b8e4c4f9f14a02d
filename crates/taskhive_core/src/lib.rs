//! Core domain logic for taskhive.
//! This crate is the single source of truth for form validation and
//! keyword search over the worker/task/project schema.

pub mod db;
pub mod form;
pub mod logging;
pub mod model;
pub mod repo;

pub use form::project_form::{validate_status, ProjectCreationForm};
pub use form::search::{
    PositionSearchForm, ProjectSearchForm, TaskSearchForm, TaskTypeSearchForm, TeamSearchForm,
    WorkerSearchForm,
};
pub use form::task_form::{validate_deadline, validate_is_completed, TaskForm};
pub use form::team_form::TeamCreationForm;
pub use form::worker_form::WorkerCreationForm;
pub use form::{FieldErrors, FieldKind, FieldSchema, FormData, FormError, ValidationError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::catalog::{Position, PositionId, TaskType, TaskTypeId};
pub use model::project::{NewProject, Project, ProjectId, ProjectStatus};
pub use model::task::{NewTask, Task, TaskId};
pub use model::team::{NewTeam, Team, TeamId};
pub use model::worker::{NewWorker, Worker, WorkerId};
pub use repo::catalog_repo::{CatalogRepository, SqliteCatalogRepository};
pub use repo::predicate::{contains_any, Predicate};
pub use repo::project_repo::{ProjectRepository, SqliteProjectRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::team_repo::{SqliteTeamRepository, TeamRepository};
pub use repo::worker_repo::{SqliteWorkerRepository, WorkerRepository};
pub use repo::{RepoError, RepoResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
