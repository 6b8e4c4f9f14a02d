//! Form binding and validation primitives.
//!
//! # Responsibility
//! - Hold raw submitted field data the way HTML form posts decode.
//! - Bind raw values into typed ones, collecting field-scoped errors.
//! - Define the error taxonomy shared by all forms.
//!
//! # Invariants
//! - A malformed submission always yields a structured error result,
//!   never a panic.
//! - Error messages are stable user-facing strings; callers key on the
//!   field name, not on message text.
//! - Text fields are trimmed on binding; password fields never are.

use crate::repo::RepoError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::debug;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod credentials;
pub mod project_form;
pub mod search;
pub mod task_form;
pub mod team_form;
pub mod worker_form;

/// Message attached to a missing required field.
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Message attached to an unparsable date/time value.
pub const INVALID_DATETIME_MESSAGE: &str = "Enter a valid date/time.";

/// Message attached to a single-select value that is not an available choice.
pub const INVALID_CHOICE_MESSAGE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

/// Message attached to a multi-select or fixed-choice value that is not an
/// available choice.
pub(crate) fn invalid_choice_message(value: &str) -> String {
    format!("Select a valid choice. {value} is not one of the available choices.")
}

/// Message attached to a multi-select entry that is not even a parsable id.
pub(crate) fn invalid_pk_message(value: &str) -> String {
    format!("\"{value}\" is not a valid value.")
}

/// Raw submitted form data as decoded by the hosting request layer.
///
/// Fields map to every value submitted under that name. Scalar reads take
/// the last value, mirroring HTML form post semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    values: BTreeMap<String, Vec<String>>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one value under `field`.
    pub fn append(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.entry(field.into()).or_default().push(value.into());
    }

    /// Builder form of [`FormData::append`].
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(field, value);
        self
    }

    /// Returns the last submitted value for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values
            .get(field)
            .and_then(|values| values.last())
            .map(String::as_str)
    }

    /// Returns all submitted values for `field`, in submission order.
    pub fn get_all(&self, field: &str) -> &[String] {
        self.values.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Declared type of a form field, driving binding and rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, trimmed on binding.
    Text,
    /// Write-only text, bound without trimming.
    Password,
    /// Checkbox; an absent field binds to `false`.
    Checkbox,
    /// Date and time, accepted in several common submission formats.
    DateTime,
    /// Single reference to another record, submitted as its id.
    Select,
    /// Multiple references to other records, one id per submitted value.
    MultiSelect,
    /// Single choice from a fixed value list.
    Choice,
}

/// One declared field of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Input hint for rendering layers; binding ignores it.
    pub placeholder: Option<&'static str>,
}

/// Single field-scoped validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Field the failure is attached to.
    pub field: &'static str,
    /// Stable user-facing message.
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl Error for ValidationError {}

/// Field name to error messages mapping produced by a failed validation.
///
/// Fields iterate in name order, messages in the order they were recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    errors: BTreeMap<&'static str, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one message against `field`.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.entry(field).or_default().push(message.into());
    }

    /// Records one [`ValidationError`].
    pub fn push(&mut self, error: ValidationError) {
        self.add(error.field, error.message);
    }

    /// Returns whether no errors were recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the messages recorded against `field`, empty when clean.
    pub fn messages(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the offending field names in name order.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.keys().copied()
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.errors {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl Error for FieldErrors {}

/// Failure surfaced by form validation.
#[derive(Debug)]
pub enum FormError {
    /// Submission failed field-level validation.
    Invalid(FieldErrors),
    /// Persistence collaborator failed while checking references.
    Repo(RepoError),
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(errors) => write!(f, "invalid submission: {errors}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FormError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(errors) => Some(errors),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<FieldErrors> for FormError {
    fn from(value: FieldErrors) -> Self {
        Self::Invalid(value)
    }
}

impl From<RepoError> for FormError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Binds a trimmed text value.
///
/// Returns `None` with a recorded error when a required value is missing;
/// optional fields bind an absent value to an empty string.
pub(crate) fn bind_text(
    data: &FormData,
    field: FieldSchema,
    errors: &mut FieldErrors,
) -> Option<String> {
    let value = data.get(field.name).map(str::trim).unwrap_or("");
    if value.is_empty() {
        if field.required {
            errors.add(field.name, REQUIRED_MESSAGE);
            return None;
        }
        return Some(String::new());
    }
    Some(value.to_string())
}

/// Binds a password value without trimming.
pub(crate) fn bind_password(
    data: &FormData,
    field: FieldSchema,
    errors: &mut FieldErrors,
) -> Option<String> {
    let value = data.get(field.name).unwrap_or("");
    if value.is_empty() {
        if field.required {
            errors.add(field.name, REQUIRED_MESSAGE);
            return None;
        }
        return Some(String::new());
    }
    Some(value.to_string())
}

/// Binds a checkbox value. Absent, empty, `false` and `0` bind to `false`.
pub(crate) fn bind_checkbox(data: &FormData, field: FieldSchema) -> bool {
    match data.get(field.name) {
        None => false,
        Some(value) => {
            let lowered = value.trim().to_ascii_lowercase();
            !(lowered.is_empty() || lowered == "false" || lowered == "0")
        }
    }
}

/// Binds a date/time value, accepting RFC 3339 plus the common HTML
/// submission formats. Naive values are interpreted as UTC.
pub(crate) fn bind_datetime(
    data: &FormData,
    field: FieldSchema,
    errors: &mut FieldErrors,
) -> Option<DateTime<Utc>> {
    let raw = data.get(field.name).map(str::trim).unwrap_or("");
    if raw.is_empty() {
        if field.required {
            errors.add(field.name, REQUIRED_MESSAGE);
        }
        return None;
    }
    match parse_datetime(raw) {
        Some(value) => Some(value),
        None => {
            errors.add(field.name, INVALID_DATETIME_MESSAGE);
            None
        }
    }
}

fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
        return Some(value.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    None
}

/// Binds a single-select reference id.
pub(crate) fn bind_select(
    data: &FormData,
    field: FieldSchema,
    errors: &mut FieldErrors,
) -> Option<Uuid> {
    let raw = data.get(field.name).map(str::trim).unwrap_or("");
    if raw.is_empty() {
        if field.required {
            errors.add(field.name, REQUIRED_MESSAGE);
        }
        return None;
    }
    match Uuid::parse_str(raw) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add(field.name, INVALID_CHOICE_MESSAGE);
            None
        }
    }
}

/// Binds a multi-select reference list, deduplicated and sorted.
pub(crate) fn bind_multi_select(
    data: &FormData,
    field: FieldSchema,
    errors: &mut FieldErrors,
) -> Option<Vec<Uuid>> {
    let raw_values = data.get_all(field.name);
    if raw_values.is_empty() {
        if field.required {
            errors.add(field.name, REQUIRED_MESSAGE);
            return None;
        }
        return Some(Vec::new());
    }

    let mut ids = BTreeSet::new();
    let mut valid = true;
    for raw in raw_values {
        let trimmed = raw.trim();
        match Uuid::parse_str(trimmed) {
            Ok(id) => {
                ids.insert(id);
            }
            Err(_) => {
                errors.add(field.name, invalid_pk_message(trimmed));
                valid = false;
            }
        }
    }

    if !valid {
        return None;
    }
    Some(ids.into_iter().collect())
}

/// Binds a fixed-choice raw value without interpretation.
pub(crate) fn bind_raw(
    data: &FormData,
    field: FieldSchema,
    errors: &mut FieldErrors,
) -> Option<String> {
    let value = data.get(field.name).unwrap_or("");
    if value.is_empty() {
        if field.required {
            errors.add(field.name, REQUIRED_MESSAGE);
        }
        return None;
    }
    Some(value.to_string())
}

/// Emits one metadata-only log line per completed validation.
pub(crate) fn log_validation_outcome(form: &'static str, errors: &FieldErrors) {
    if errors.is_empty() {
        debug!("event=form_validate module=form form={form} status=ok");
    } else {
        let fields = errors.fields().collect::<Vec<_>>().join(",");
        debug!("event=form_validate module=form form={form} status=invalid fields={fields}");
    }
}

#[cfg(test)]
mod tests {
    use super::{
        bind_checkbox, bind_datetime, bind_multi_select, bind_password, bind_select, bind_text,
        FieldErrors, FieldKind, FieldSchema, FormData, INVALID_CHOICE_MESSAGE,
        INVALID_DATETIME_MESSAGE, REQUIRED_MESSAGE,
    };
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    const NAME: FieldSchema = FieldSchema {
        name: "name",
        kind: FieldKind::Text,
        required: true,
        placeholder: None,
    };
    const NICKNAME: FieldSchema = FieldSchema {
        name: "nickname",
        kind: FieldKind::Text,
        required: false,
        placeholder: None,
    };
    const PASSWORD: FieldSchema = FieldSchema {
        name: "password1",
        kind: FieldKind::Password,
        required: true,
        placeholder: None,
    };
    const DONE: FieldSchema = FieldSchema {
        name: "done",
        kind: FieldKind::Checkbox,
        required: false,
        placeholder: None,
    };
    const DUE: FieldSchema = FieldSchema {
        name: "due",
        kind: FieldKind::DateTime,
        required: true,
        placeholder: None,
    };
    const OWNER: FieldSchema = FieldSchema {
        name: "owner",
        kind: FieldKind::Select,
        required: true,
        placeholder: None,
    };
    const TAGS: FieldSchema = FieldSchema {
        name: "tags",
        kind: FieldKind::MultiSelect,
        required: true,
        placeholder: None,
    };

    #[test]
    fn form_data_scalar_read_takes_last_value() {
        let data = FormData::new().with("name", "first").with("name", "second");
        assert_eq!(data.get("name"), Some("second"));
        assert_eq!(data.get_all("name").len(), 2);
    }

    #[test]
    fn bind_text_trims_and_reports_required() {
        let mut errors = FieldErrors::new();
        let data = FormData::new().with("name", "  Bee hive  ");
        assert_eq!(
            bind_text(&data, NAME, &mut errors).as_deref(),
            Some("Bee hive")
        );

        let missing = bind_text(&FormData::new(), NAME, &mut errors);
        assert_eq!(missing, None);
        assert_eq!(errors.messages("name"), [REQUIRED_MESSAGE]);
    }

    #[test]
    fn bind_text_optional_binds_empty_string() {
        let mut errors = FieldErrors::new();
        let value = bind_text(&FormData::new(), NICKNAME, &mut errors);
        assert_eq!(value.as_deref(), Some(""));
        assert!(errors.is_empty());
    }

    #[test]
    fn bind_password_preserves_whitespace() {
        let mut errors = FieldErrors::new();
        let data = FormData::new().with("password1", "  spaces matter  ");
        assert_eq!(
            bind_password(&data, PASSWORD, &mut errors).as_deref(),
            Some("  spaces matter  ")
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn bind_checkbox_falsey_values() {
        assert!(!bind_checkbox(&FormData::new(), DONE));
        assert!(!bind_checkbox(&FormData::new().with("done", ""), DONE));
        assert!(!bind_checkbox(&FormData::new().with("done", "False"), DONE));
        assert!(!bind_checkbox(&FormData::new().with("done", "0"), DONE));
        assert!(bind_checkbox(&FormData::new().with("done", "on"), DONE));
        assert!(bind_checkbox(&FormData::new().with("done", "true"), DONE));
    }

    #[test]
    fn bind_datetime_accepts_html_formats_and_flags_garbage() {
        let mut errors = FieldErrors::new();
        let bound = bind_datetime(
            &FormData::new().with("due", "2031-05-01T09:30"),
            DUE,
            &mut errors,
        )
        .expect("datetime-local format should bind");
        assert_eq!(bound, Utc.with_ymd_and_hms(2031, 5, 1, 9, 30, 0).unwrap());

        let date_only = bind_datetime(&FormData::new().with("due", "2031-05-01"), DUE, &mut errors)
            .expect("date-only format should bind");
        assert_eq!(
            date_only,
            Utc.with_ymd_and_hms(2031, 5, 1, 0, 0, 0).unwrap()
        );

        let garbage = bind_datetime(&FormData::new().with("due", "not a date"), DUE, &mut errors);
        assert_eq!(garbage, None);
        assert_eq!(errors.messages("due"), [INVALID_DATETIME_MESSAGE]);
    }

    #[test]
    fn bind_select_flags_unparsable_id_as_invalid_choice() {
        let mut errors = FieldErrors::new();
        let bound = bind_select(&FormData::new().with("owner", "not-a-uuid"), OWNER, &mut errors);
        assert_eq!(bound, None);
        assert_eq!(errors.messages("owner"), [INVALID_CHOICE_MESSAGE]);
    }

    #[test]
    fn bind_multi_select_dedupes_and_sorts() {
        let low = Uuid::parse_str("11111111-1111-4111-8111-111111111111").unwrap();
        let high = Uuid::parse_str("99999999-9999-4999-8999-999999999999").unwrap();
        let data = FormData::new()
            .with("tags", high.to_string())
            .with("tags", low.to_string())
            .with("tags", high.to_string());

        let mut errors = FieldErrors::new();
        let bound = bind_multi_select(&data, TAGS, &mut errors).expect("ids should bind");
        assert_eq!(bound, vec![low, high]);
        assert!(errors.is_empty());
    }

    #[test]
    fn bind_multi_select_reports_each_bad_value() {
        let mut errors = FieldErrors::new();
        let data = FormData::new().with("tags", "nope");
        assert_eq!(bind_multi_select(&data, TAGS, &mut errors), None);
        assert_eq!(
            errors.messages("tags"),
            ["\"nope\" is not a valid value.".to_string()]
        );
    }

    #[test]
    fn field_errors_display_joins_field_and_message() {
        let mut errors = FieldErrors::new();
        errors.add("name", REQUIRED_MESSAGE);
        errors.add("due", INVALID_DATETIME_MESSAGE);
        let rendered = errors.to_string();
        assert!(rendered.contains("name: This field is required."));
        assert!(rendered.contains("; "));
    }
}
