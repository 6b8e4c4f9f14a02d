//! Task creation/edit form.
//!
//! # Responsibility
//! - Bind and validate task submissions into persist-ready payloads.
//! - Enforce the completion-at-creation and deadline business rules.
//!
//! # Invariants
//! - A new task cannot be created already completed.
//! - A deadline earlier than `now` is rejected on create and edit alike.
//! - No partial state escapes a failed validation.

use crate::form::{
    bind_checkbox, bind_datetime, bind_multi_select, bind_select, bind_text,
    invalid_choice_message, log_validation_outcome, FieldErrors, FieldKind, FieldSchema, FormData,
    FormError, ValidationError, INVALID_CHOICE_MESSAGE,
};
use crate::model::task::{NewTask, TaskId};
use crate::repo::catalog_repo::CatalogRepository;
use crate::repo::worker_repo::WorkerRepository;
use chrono::{DateTime, Utc};

const NAME: FieldSchema = FieldSchema {
    name: "name",
    kind: FieldKind::Text,
    required: true,
    placeholder: None,
};
const DEADLINE: FieldSchema = FieldSchema {
    name: "deadline",
    kind: FieldKind::DateTime,
    required: true,
    placeholder: None,
};
const IS_COMPLETED: FieldSchema = FieldSchema {
    name: "is_completed",
    kind: FieldKind::Checkbox,
    required: false,
    placeholder: None,
};
const TASK_TYPE: FieldSchema = FieldSchema {
    name: "task_type",
    kind: FieldKind::Select,
    required: true,
    placeholder: None,
};
const ASSIGNEES: FieldSchema = FieldSchema {
    name: "assignees",
    kind: FieldKind::MultiSelect,
    required: true,
    placeholder: None,
};

const SCHEMA: &[FieldSchema] = &[NAME, DEADLINE, IS_COMPLETED, TASK_TYPE, ASSIGNEES];

/// Task creation/edit form bound to raw submitted data.
#[derive(Debug, Clone)]
pub struct TaskForm {
    data: FormData,
    instance_id: Option<TaskId>,
}

impl TaskForm {
    /// Creates a form for a brand new task.
    pub fn new(data: FormData) -> Self {
        Self {
            data,
            instance_id: None,
        }
    }

    /// Creates a form editing the task identified by `instance_id`.
    pub fn for_instance(instance_id: TaskId, data: FormData) -> Self {
        Self {
            data,
            instance_id: Some(instance_id),
        }
    }

    /// Returns whether this submission creates a new task.
    pub fn is_new(&self) -> bool {
        self.instance_id.is_none()
    }

    /// Returns the id of the task being edited, if any.
    pub fn instance_id(&self) -> Option<TaskId> {
        self.instance_id
    }

    /// Declared fields, in presentation order.
    pub fn schema() -> &'static [FieldSchema] {
        SCHEMA
    }

    /// Validates the submission into a persist-ready payload.
    ///
    /// Reference existence is checked through the provided repositories;
    /// `now` anchors the deadline rule.
    ///
    /// # Errors
    /// - [`FormError::Invalid`] with per-field messages for rejected input.
    /// - [`FormError::Repo`] when a repository lookup fails.
    pub fn validate(
        &self,
        catalog: &impl CatalogRepository,
        workers: &impl WorkerRepository,
        now: DateTime<Utc>,
    ) -> Result<NewTask, FormError> {
        let mut errors = FieldErrors::new();

        let name = bind_text(&self.data, NAME, &mut errors);
        let deadline = bind_datetime(&self.data, DEADLINE, &mut errors);
        let is_completed = bind_checkbox(&self.data, IS_COMPLETED);
        let task_type = bind_select(&self.data, TASK_TYPE, &mut errors);
        let assignees = bind_multi_select(&self.data, ASSIGNEES, &mut errors);

        if let Err(error) = validate_is_completed(is_completed, self.is_new()) {
            errors.push(error);
        }

        let deadline = deadline.and_then(|candidate| match validate_deadline(candidate, now) {
            Ok(value) => Some(value),
            Err(error) => {
                errors.push(error);
                None
            }
        });

        let task_type = match task_type {
            Some(id) => {
                if catalog.task_type_exists(id)? {
                    Some(id)
                } else {
                    errors.add(TASK_TYPE.name, INVALID_CHOICE_MESSAGE);
                    None
                }
            }
            None => None,
        };

        let assignees = match assignees {
            Some(ids) => {
                let mut all_known = true;
                for id in &ids {
                    if !workers.worker_exists(*id)? {
                        errors.add(ASSIGNEES.name, invalid_choice_message(&id.to_string()));
                        all_known = false;
                    }
                }
                all_known.then_some(ids)
            }
            None => None,
        };

        log_validation_outcome("task", &errors);

        match (name, deadline, task_type, assignees) {
            (Some(name), Some(deadline), Some(task_type), Some(assignees))
                if errors.is_empty() =>
            {
                Ok(NewTask {
                    name,
                    deadline,
                    is_completed,
                    task_type,
                    assignees,
                })
            }
            _ => Err(FormError::Invalid(errors)),
        }
    }
}

/// Rejects completing a task at creation time, passing the value through
/// otherwise.
pub fn validate_is_completed(candidate: bool, is_new: bool) -> Result<bool, ValidationError> {
    if is_new && candidate {
        return Err(ValidationError::new(
            IS_COMPLETED.name,
            "Status can't be set as 'completed' during task creation.",
        ));
    }
    Ok(candidate)
}

/// Rejects deadlines earlier than `now`, passing the value through
/// otherwise.
pub fn validate_deadline(
    candidate: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, ValidationError> {
    if candidate < now {
        return Err(ValidationError::new(
            DEADLINE.name,
            "Deadline can't be earlier than current date",
        ));
    }
    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::{validate_deadline, validate_is_completed};
    use chrono::{Duration, Utc};

    #[test]
    fn completed_flag_rejected_only_for_new_tasks() {
        let error = validate_is_completed(true, true).expect_err("new + completed should fail");
        assert_eq!(error.field, "is_completed");
        assert_eq!(
            error.message,
            "Status can't be set as 'completed' during task creation."
        );

        assert_eq!(validate_is_completed(true, false), Ok(true));
        assert_eq!(validate_is_completed(false, true), Ok(false));
    }

    #[test]
    fn deadline_must_not_be_in_the_past() {
        let now = Utc::now();
        let error =
            validate_deadline(now - Duration::seconds(1), now).expect_err("past should fail");
        assert_eq!(error.field, "deadline");
        assert_eq!(error.message, "Deadline can't be earlier than current date");

        assert_eq!(validate_deadline(now, now), Ok(now));
        assert!(validate_deadline(now + Duration::days(1), now).is_ok());
    }
}
