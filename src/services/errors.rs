use thiserror::Error;

use crate::directory::errors::DirectoryError;
use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;

/// Failure kinds surfaced by the user services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    UserNotFound(String),

    #[error("{0}")]
    RoleNotFound(String),

    #[error("{0}")]
    ValidationFailed(String),

    /// The identity provider answered with a failure; `status` is its HTTP
    /// status when one was received.
    #[error("{message}")]
    RemoteFailure { status: Option<u16>, message: String },

    #[error("{0}")]
    Unreachable(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<DirectoryError> for ServiceError {
    fn from(err: DirectoryError) -> Self {
        let message = err.to_string();
        match err {
            DirectoryError::UserNotFound { .. } => ServiceError::UserNotFound(message),
            DirectoryError::RoleNotFound(_) => ServiceError::RoleNotFound(message),
            DirectoryError::CreationFailed { status, .. }
            | DirectoryError::DeletionFailed(status)
            | DirectoryError::Remote { status, .. } => ServiceError::RemoteFailure {
                status: Some(status),
                message,
            },
            DirectoryError::Authentication(_)
            | DirectoryError::InvalidResponse(_)
            | DirectoryError::InvalidConfig(_) => ServiceError::RemoteFailure {
                status: None,
                message,
            },
            DirectoryError::Unreachable(_) => ServiceError::Unreachable(message),
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::ValidationFailed(err.to_string())
    }
}

impl From<TypeConstraintError> for ServiceError {
    fn from(err: TypeConstraintError) -> Self {
        ServiceError::ValidationFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_errors_keep_their_message() {
        let err = ServiceError::from(DirectoryError::user_not_found("42"));
        assert!(matches!(err, ServiceError::UserNotFound(_)));
        assert_eq!(err.to_string(), "User not found with id: 42");
    }

    #[test]
    fn remote_statuses_are_preserved() {
        let err = ServiceError::from(DirectoryError::CreationFailed {
            status: 409,
            reason: "User exists with same username".to_string(),
        });
        assert!(matches!(
            err,
            ServiceError::RemoteFailure {
                status: Some(409),
                ..
            }
        ));

        let err = ServiceError::from(DirectoryError::Authentication("denied".to_string()));
        assert!(matches!(err, ServiceError::RemoteFailure { status: None, .. }));
    }

    #[test]
    fn transport_failures_are_unreachable() {
        let err = ServiceError::from(DirectoryError::Unreachable("refused".to_string()));
        assert!(matches!(err, ServiceError::Unreachable(_)));
    }

    #[test]
    fn form_errors_are_validation_failures() {
        let err = ServiceError::from(FormError::InvalidRole("bogus".to_string()));
        assert!(matches!(err, ServiceError::ValidationFailed(ref m) if m == "Invalid role: bogus"));
    }
}
