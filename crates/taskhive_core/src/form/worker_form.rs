//! Worker account creation form.
//!
//! # Responsibility
//! - Bind and validate signup submissions into persist-ready payloads.
//! - Compose the shared credential flow with the position requirement.
//!
//! # Invariants
//! - `position` must reference an existing position record.
//! - First/last names are optional and bind to empty strings when absent.

use crate::form::credentials::{validate_credentials, PASSWORD1, PASSWORD2, USERNAME};
use crate::form::{
    bind_select, bind_text, log_validation_outcome, FieldErrors, FieldKind, FieldSchema, FormData,
    FormError, INVALID_CHOICE_MESSAGE,
};
use crate::model::worker::NewWorker;
use crate::repo::catalog_repo::CatalogRepository;
use crate::repo::worker_repo::WorkerRepository;

const POSITION: FieldSchema = FieldSchema {
    name: "position",
    kind: FieldKind::Select,
    required: true,
    placeholder: None,
};
const FIRST_NAME: FieldSchema = FieldSchema {
    name: "first_name",
    kind: FieldKind::Text,
    required: false,
    placeholder: None,
};
const LAST_NAME: FieldSchema = FieldSchema {
    name: "last_name",
    kind: FieldKind::Text,
    required: false,
    placeholder: None,
};

const SCHEMA: &[FieldSchema] = &[USERNAME, POSITION, FIRST_NAME, LAST_NAME, PASSWORD1, PASSWORD2];

/// Worker signup form bound to raw submitted data.
#[derive(Debug, Clone)]
pub struct WorkerCreationForm {
    data: FormData,
}

impl WorkerCreationForm {
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
    pub fn validate(
        &self,
        catalog: &impl CatalogRepository,
        workers: &impl WorkerRepository,
    ) -> Result<NewWorker, FormError> {
        let mut errors = FieldErrors::new();

        let credentials = validate_credentials(&self.data, workers, &mut errors)?;

        let position = match bind_select(&self.data, POSITION, &mut errors) {
            Some(id) => {
                if catalog.position_exists(id)? {
                    Some(id)
                } else {
                    errors.add(POSITION.name, INVALID_CHOICE_MESSAGE);
                    None
                }
            }
            None => None,
        };

        let first_name = bind_text(&self.data, FIRST_NAME, &mut errors);
        let last_name = bind_text(&self.data, LAST_NAME, &mut errors);

        log_validation_outcome("worker", &errors);

        match (credentials, position, first_name, last_name) {
            (Some(credentials), Some(position), Some(first_name), Some(last_name))
                if errors.is_empty() =>
            {
                Ok(NewWorker {
                    username: credentials.username,
                    first_name,
                    last_name,
                    password: credentials.password,
                    position,
                })
            }
            _ => Err(FormError::Invalid(errors)),
        }
    }
}
