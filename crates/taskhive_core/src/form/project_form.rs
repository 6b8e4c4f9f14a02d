//! Project creation/edit form.
//!
//! # Responsibility
//! - Bind and validate project submissions into persist-ready payloads.
//! - Enforce the completed-at-creation business rule.
//!
//! # Invariants
//! - A new project cannot be created with status `completed`.
//! - Every referenced team must exist.

use crate::form::{
    bind_multi_select, bind_raw, bind_text, invalid_choice_message, log_validation_outcome,
    FieldErrors, FieldKind, FieldSchema, FormData, FormError, ValidationError,
};
use crate::model::project::{NewProject, ProjectId, ProjectStatus};
use crate::repo::team_repo::TeamRepository;

const NAME: FieldSchema = FieldSchema {
    name: "name",
    kind: FieldKind::Text,
    required: true,
    placeholder: None,
};
const STATUS: FieldSchema = FieldSchema {
    name: "status",
    kind: FieldKind::Choice,
    required: true,
    placeholder: None,
};
const TEAM: FieldSchema = FieldSchema {
    name: "team",
    kind: FieldKind::MultiSelect,
    required: true,
    placeholder: None,
};

const SCHEMA: &[FieldSchema] = &[NAME, STATUS, TEAM];

/// Project creation/edit form bound to raw submitted data.
#[derive(Debug, Clone)]
pub struct ProjectCreationForm {
    data: FormData,
    instance_id: Option<ProjectId>,
}

impl ProjectCreationForm {
    /// Creates a form for a brand new project.
    pub fn new(data: FormData) -> Self {
        Self {
            data,
            instance_id: None,
        }
    }

    /// Creates a form editing the project identified by `instance_id`.
    pub fn for_instance(instance_id: ProjectId, data: FormData) -> Self {
        Self {
            data,
            instance_id: Some(instance_id),
        }
    }

    /// Returns whether this submission creates a new project.
    pub fn is_new(&self) -> bool {
        self.instance_id.is_none()
    }

    /// Returns the id of the project being edited, if any.
    pub fn instance_id(&self) -> Option<ProjectId> {
        self.instance_id
    }

    /// Declared fields, in presentation order.
    pub fn schema() -> &'static [FieldSchema] {
        SCHEMA
    }

    /// Validates the submission into a persist-ready payload.
    ///
    /// # Errors
    /// - [`FormError::Invalid`] with per-field messages for rejected input.
    /// - [`FormError::Repo`] when a repository lookup fails.
    pub fn validate(&self, teams: &impl TeamRepository) -> Result<NewProject, FormError> {
        let mut errors = FieldErrors::new();

        let name = bind_text(&self.data, NAME, &mut errors);

        let status = bind_raw(&self.data, STATUS, &mut errors).and_then(|raw| {
            match ProjectStatus::parse(&raw) {
                Some(status) => Some(status),
                None => {
                    errors.add(STATUS.name, invalid_choice_message(&raw));
                    None
                }
            }
        });
        let status = status.and_then(|candidate| {
            match validate_status(candidate, self.is_new()) {
                Ok(value) => Some(value),
                Err(error) => {
                    errors.push(error);
                    None
                }
            }
        });

        let team_ids = match bind_multi_select(&self.data, TEAM, &mut errors) {
            Some(ids) => {
                let mut all_known = true;
                for id in &ids {
                    if !teams.team_exists(*id)? {
                        errors.add(TEAM.name, invalid_choice_message(&id.to_string()));
                        all_known = false;
                    }
                }
                all_known.then_some(ids)
            }
            None => None,
        };

        log_validation_outcome("project", &errors);

        match (name, status, team_ids) {
            (Some(name), Some(status), Some(teams)) if errors.is_empty() => Ok(NewProject {
                name,
                status,
                teams,
            }),
            _ => Err(FormError::Invalid(errors)),
        }
    }
}

/// Rejects completing a project at creation time, passing the value
/// through otherwise.
pub fn validate_status(
    candidate: ProjectStatus,
    is_new: bool,
) -> Result<ProjectStatus, ValidationError> {
    if is_new && candidate == ProjectStatus::Completed {
        return Err(ValidationError::new(
            STATUS.name,
            "Status can't be set as 'completed' during project creation.",
        ));
    }
    Ok(candidate)
}
