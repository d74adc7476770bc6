use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::types::TypeConstraintError;

#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The identity provider has no user matching `field = value`.
    #[error("User not found with {field}: {value}")]
    UserNotFound { field: &'static str, value: String },

    #[error("Role not found: {0}")]
    RoleNotFound(String),

    #[error("Failed to create user. Status: {status} {reason}")]
    CreationFailed { status: u16, reason: String },

    #[error("Failed to delete user. Status: {0}")]
    DeletionFailed(u16),

    #[error("Identity provider error ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("Identity provider authentication failed: {0}")]
    Authentication(String),

    #[error("Identity provider unreachable: {0}")]
    Unreachable(String),

    #[error("Unexpected identity provider response: {0}")]
    InvalidResponse(String),

    #[error("Invalid directory configuration: {0}")]
    InvalidConfig(String),
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;

impl DirectoryError {
    pub fn user_not_found(id: impl Into<String>) -> Self {
        DirectoryError::UserNotFound {
            field: "id",
            value: id.into(),
        }
    }

    pub fn email_not_found(email: impl Into<String>) -> Self {
        DirectoryError::UserNotFound {
            field: "email",
            value: email.into(),
        }
    }

    pub fn remote(status: StatusCode, message: impl Into<String>) -> Self {
        DirectoryError::Remote {
            status: status.as_u16(),
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for DirectoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DirectoryError::InvalidResponse(err.to_string())
        } else if err.is_builder() {
            DirectoryError::InvalidConfig(err.to_string())
        } else if let Some(status) = err.status() {
            DirectoryError::remote(status, err.to_string())
        } else {
            DirectoryError::Unreachable(err.to_string())
        }
    }
}

impl From<TypeConstraintError> for DirectoryError {
    fn from(err: TypeConstraintError) -> Self {
        DirectoryError::InvalidResponse(err.to_string())
    }
}
