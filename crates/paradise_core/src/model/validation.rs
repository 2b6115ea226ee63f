//! Editor-level input rules.
//!
//! Stores accept any input; these checks run before user input reaches them.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub const MIN_USERNAME_CHARS: usize = 3;
pub const MIN_PASSWORD_CHARS: usize = 6;

/// Rejected user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    UsernameTooShort,
    PasswordTooShort,
    BlankDisplayName,
    BlankTaskTitle,
    BlankCategoryName,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UsernameTooShort => write!(
                f,
                "username must be at least {MIN_USERNAME_CHARS} characters"
            ),
            Self::PasswordTooShort => write!(
                f,
                "password must be at least {MIN_PASSWORD_CHARS} characters"
            ),
            Self::BlankDisplayName => write!(f, "display name cannot be empty"),
            Self::BlankTaskTitle => write!(f, "task title cannot be empty"),
            Self::BlankCategoryName => write!(f, "category name cannot be empty"),
        }
    }
}

impl Error for ValidationError {}

/// Checks registration input in the order a sign-up form reports it.
pub fn validate_registration(
    username: &str,
    password: &str,
    display_name: &str,
) -> Result<(), ValidationError> {
    if username.chars().count() < MIN_USERNAME_CHARS {
        return Err(ValidationError::UsernameTooShort);
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ValidationError::PasswordTooShort);
    }
    if display_name.trim().is_empty() {
        return Err(ValidationError::BlankDisplayName);
    }
    Ok(())
}
