// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Request body validation.
//!
//! Checks run in a fixed order and stop at the first failure, so the message
//! always names a single field.

use accounts_common::RegisterRequest;
use thiserror::Error;

/// Possible validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name is required")]
    MissingName,

    #[error("email is required")]
    MissingEmail,

    #[error("password is required")]
    MissingPassword,

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("name is incorrect")]
    MissingLoginName,

    /// Empty or wrong password at login; both cases share one message
    #[error("invalid password")]
    InvalidPassword,
}

impl ValidationError {
    /// Field the error is about
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingName | ValidationError::MissingLoginName => "name",
            ValidationError::MissingEmail => "email",
            ValidationError::MissingPassword | ValidationError::InvalidPassword => "password",
            ValidationError::PasswordMismatch => "confirmpassword",
        }
    }
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a registration body
pub fn validate_registration(req: &RegisterRequest) -> ValidationResult<()> {
    if req.name.is_empty() {
        return Err(ValidationError::MissingName);
    }
    if req.email.is_empty() {
        return Err(ValidationError::MissingEmail);
    }
    if req.password.is_empty() {
        return Err(ValidationError::MissingPassword);
    }
    if req.password != req.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Validate login credentials before any lookup
pub fn validate_login(name: &str, password: &str) -> ValidationResult<()> {
    if name.is_empty() {
        return Err(ValidationError::MissingLoginName);
    }
    if password.is_empty() {
        return Err(ValidationError::InvalidPassword);
    }
    Ok(())
}
