//! Request payloads accepted by the user API.

use thiserror::Error;
use validator::ValidationErrors;

pub mod users;

#[derive(Debug, Error)]
/// Errors that can occur when processing request payloads.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Password is required")]
    MissingPassword,

    #[error("Username cannot be empty")]
    EmptyUsername,
}
