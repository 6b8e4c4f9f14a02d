//! Credential validation shared by account-creation forms.
//!
//! # Responsibility
//! - Validate username shape, length and uniqueness.
//! - Validate the two-password confirmation flow.
//!
//! # Invariants
//! - Passwords are compared byte-for-byte, untrimmed.
//! - Username uniqueness is checked only after local checks pass.

use crate::form::{bind_password, bind_text, FieldErrors, FieldKind, FieldSchema, FormData};
use crate::repo::worker_repo::WorkerRepository;
use crate::repo::RepoError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum accepted username length in characters.
pub const USERNAME_MAX_CHARS: usize = 150;

/// Message attached to a username that is already taken.
pub const DUPLICATE_USERNAME_MESSAGE: &str = "A user with that username already exists.";

/// Message attached to a username with characters outside the allowed set.
pub const INVALID_USERNAME_MESSAGE: &str =
    "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";

/// Message attached to `password2` when the two passwords differ.
pub const PASSWORD_MISMATCH_MESSAGE: &str = "The two password fields didn't match.";

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A[\w.@+-]+\z").expect("valid username regex"));

/// Declared `username` field.
pub const USERNAME: FieldSchema = FieldSchema {
    name: "username",
    kind: FieldKind::Text,
    required: true,
    placeholder: None,
};

/// Declared first password field.
pub const PASSWORD1: FieldSchema = FieldSchema {
    name: "password1",
    kind: FieldKind::Password,
    required: true,
    placeholder: None,
};

/// Declared confirmation password field.
pub const PASSWORD2: FieldSchema = FieldSchema {
    name: "password2",
    kind: FieldKind::Password,
    required: true,
    placeholder: None,
};

/// Validated username + password pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Validates the credential fields of a submission.
///
/// Returns `Ok(None)` when validation failed, with the failures recorded
/// in `errors`; repository failures propagate as [`RepoError`].
pub fn validate_credentials(
    data: &FormData,
    workers: &impl WorkerRepository,
    errors: &mut FieldErrors,
) -> Result<Option<Credentials>, RepoError> {
    let username = bind_text(data, USERNAME, errors).and_then(|username| {
        let mut valid = true;
        let chars = username.chars().count();
        if chars > USERNAME_MAX_CHARS {
            errors.add(
                USERNAME.name,
                format!(
                    "Ensure this value has at most {USERNAME_MAX_CHARS} characters (it has {chars})."
                ),
            );
            valid = false;
        }
        if !USERNAME_RE.is_match(&username) {
            errors.add(USERNAME.name, INVALID_USERNAME_MESSAGE);
            valid = false;
        }
        valid.then_some(username)
    });

    let username = match username {
        Some(username) => {
            if workers.username_exists(&username)? {
                errors.add(USERNAME.name, DUPLICATE_USERNAME_MESSAGE);
                None
            } else {
                Some(username)
            }
        }
        None => None,
    };

    let password1 = bind_password(data, PASSWORD1, errors);
    let password2 = bind_password(data, PASSWORD2, errors);

    // Mismatch is reported only when both passwords bound.
    let password = match (password1, password2) {
        (Some(first), Some(second)) => {
            if first == second {
                Some(first)
            } else {
                errors.add(PASSWORD2.name, PASSWORD_MISMATCH_MESSAGE);
                None
            }
        }
        _ => None,
    };

    match (username, password) {
        (Some(username), Some(password)) => Ok(Some(Credentials { username, password })),
        _ => Ok(None),
    }
}
