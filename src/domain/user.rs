//! User aggregate projected from the identity provider.

use serde::Serialize;

use crate::domain::role::Role;
use crate::domain::types::UserId;

/// Directory user as exposed to API consumers.
///
/// The identity provider stays authoritative: a `User` is rebuilt on every
/// fetch and never stored locally.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub enabled: bool,
    roles: Vec<Role>,
}

impl User {
    #[must_use]
    pub fn new(
        id: UserId,
        username: String,
        email: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
        enabled: bool,
    ) -> Self {
        Self {
            id,
            username,
            email,
            first_name,
            last_name,
            enabled,
            roles: Vec::new(),
        }
    }

    /// Replaces the role list, skipping duplicates.
    #[must_use]
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles.clear();
        for role in roles {
            self.add_role(role);
        }
        self
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Adds the role unless it is already held.
    pub fn add_role(&mut self, role: Role) {
        if !self.has_role(role) {
            self.roles.push(role);
        }
    }

    /// Drops every held role and keeps only `role`.
    pub fn set_role(&mut self, role: Role) {
        self.roles = vec![role];
    }

    pub fn role_names(&self) -> Vec<&'static str> {
        self.roles.iter().map(|role| role.name()).collect()
    }

    /// Applies the supplied fields of `patch`, leaving the rest untouched.
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(username) = patch.username {
            self.username = username;
        }
        if let Some(email) = patch.email {
            self.email = Some(email);
        }
        if let Some(first_name) = patch.first_name {
            self.first_name = Some(first_name);
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = Some(last_name);
        }
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
        if let Some(role) = patch.role {
            self.set_role(role);
        }
    }
}

/// Attributes of a user that does not exist in the directory yet.
#[derive(Clone, Debug, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub enabled: bool,
    pub role: Role,
}

impl NewUser {
    #[must_use]
    pub fn new(
        username: String,
        email: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
        enabled: Option<bool>,
        role: Option<Role>,
    ) -> Self {
        Self {
            username: username.trim().to_string(),
            email: email
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty()),
            first_name: first_name
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            last_name: last_name
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            enabled: enabled.unwrap_or(true),
            role: role.unwrap_or(Role::Client),
        }
    }
}

/// Partial update: `None` leaves the current value in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub enabled: Option<bool>,
    pub role: Option<Role>,
}
