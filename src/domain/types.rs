//! Value objects validated on construction.
use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected input for a domain value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided role name is not one of the known roles.
    #[error("invalid role: {0}")]
    InvalidRole(String),
    /// Provided sort field is not one of the sortable user attributes.
    #[error("invalid sort field: {0}")]
    InvalidSortField(String),
    /// Provided sort order is neither `asc` nor `desc`.
    #[error("invalid sort order: {0}")]
    InvalidSortOrder(String),
}

/// Identity assigned to a user by the identity provider.
///
/// Always trimmed and non-empty; deserialization enforces the same rule.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = value.into();
        match value.trim() {
            "" => Err(TypeConstraintError::EmptyString),
            trimmed if trimmed.len() == value.len() => Ok(Self(value)),
            trimmed => Ok(Self(trimmed.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

/// Credential value enforcing non-empty input.
///
/// Whitespace is preserved: a password is taken verbatim, only the empty
/// string is rejected. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = value.into();
        if value.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(value))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for Password {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}
