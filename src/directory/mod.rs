//! Typed facade over the remote identity provider.
//!
//! The traits here mirror the primitive operations of the identity provider.
//! Implementations translate requests and responses only: filtering, sorting
//! and pagination semantics live in the service layer.

use crate::{
    directory::errors::DirectoryResult,
    domain::{
        role::Role,
        types::{Password, UserId},
        user::{NewUser, User},
    },
};

pub mod errors;
pub mod keycloak;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

pub use keycloak::KeycloakDirectory;

/// Offset window forwarded to the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub first: usize,
    pub max: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserSearchQuery {
    /// Free-text filter; `None` matches every user.
    pub search: Option<String>,
    /// Without a window the whole result set is fetched.
    pub pagination: Option<Pagination>,
}

impl UserSearchQuery {
    pub fn new(search: Option<String>) -> Self {
        Self {
            search: search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            pagination: None,
        }
    }

    pub fn paginate(mut self, first: usize, max: usize) -> Self {
        self.pagination = Some(Pagination { first, max });
        self
    }
}

pub trait UserReader {
    fn list_all_users(&self) -> DirectoryResult<Vec<User>>;
    fn get_user_by_id(&self, id: &UserId) -> DirectoryResult<User>;
    /// Exact email match; the first match wins when several users share it.
    fn get_user_by_email(&self, email: &str) -> DirectoryResult<User>;
    fn search_users(&self, query: &UserSearchQuery) -> DirectoryResult<Vec<User>>;
    /// Counts users matching `query.search`, ignoring its pagination window.
    fn count_users(&self, query: &UserSearchQuery) -> DirectoryResult<usize>;
}

pub trait UserWriter {
    /// Creates the user with a permanent password and assigns its role.
    fn create_user(&self, new_user: &NewUser, password: &Password) -> DirectoryResult<User>;
    /// Replaces the mutable attributes of `user`.
    ///
    /// A non-empty role list replaces every realm role mapping of the user.
    fn update_user(&self, user: &User) -> DirectoryResult<User>;
    fn delete_user(&self, id: &UserId) -> DirectoryResult<()>;
    fn reset_password(&self, id: &UserId, password: &Password) -> DirectoryResult<()>;
    fn set_user_enabled(&self, id: &UserId, enabled: bool) -> DirectoryResult<()>;
}

pub trait RoleWriter {
    fn assign_role(&self, id: &UserId, role: Role) -> DirectoryResult<()>;
    fn remove_role(&self, id: &UserId, role: Role) -> DirectoryResult<()>;
}
