//! Team creation form.
//!
//! # Responsibility
//! - Bind and validate team submissions into persist-ready payloads.
//!
//! # Invariants
//! - Every referenced member must be an existing worker.
//! - No business rules beyond required fields and referential checks.

use crate::form::{
    bind_multi_select, bind_text, invalid_choice_message, log_validation_outcome, FieldErrors,
    FieldKind, FieldSchema, FormData, FormError,
};
use crate::model::team::NewTeam;
use crate::repo::worker_repo::WorkerRepository;

const NAME: FieldSchema = FieldSchema {
    name: "name",
    kind: FieldKind::Text,
    required: true,
    placeholder: None,
};
const MEMBERS: FieldSchema = FieldSchema {
    name: "members",
    kind: FieldKind::MultiSelect,
    required: true,
    placeholder: None,
};

const SCHEMA: &[FieldSchema] = &[NAME, MEMBERS];

/// Team creation form bound to raw submitted data.
#[derive(Debug, Clone)]
pub struct TeamCreationForm {
    data: FormData,
}

impl TeamCreationForm {
    pub fn new(data: FormData) -> Self {
        Self { data }
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
    pub fn validate(&self, workers: &impl WorkerRepository) -> Result<NewTeam, FormError> {
        let mut errors = FieldErrors::new();

        let name = bind_text(&self.data, NAME, &mut errors);

        let members = match bind_multi_select(&self.data, MEMBERS, &mut errors) {
            Some(ids) => {
                let mut all_known = true;
                for id in &ids {
                    if !workers.worker_exists(*id)? {
                        errors.add(MEMBERS.name, invalid_choice_message(&id.to_string()));
                        all_known = false;
                    }
                }
                all_known.then_some(ids)
            }
            None => None,
        };

        log_validation_outcome("team", &errors);

        match (name, members) {
            (Some(name), Some(members)) if errors.is_empty() => Ok(NewTeam { name, members }),
            _ => Err(FormError::Invalid(errors)),
        }
    }
}
