//! Realm roles understood by the user directory.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;

/// Closed set of roles a user can hold.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Client,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Admin, Role::Client];

    /// Canonical wire name used by the identity provider.
    pub const fn name(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Client => "CLIENT",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Strict parsing, for places where an unknown role is a caller error.
impl FromStr for Role {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoleName::parse(s)
            .known()
            .ok_or_else(|| TypeConstraintError::InvalidRole(s.to_string()))
    }
}

/// Result of mapping an arbitrary role name onto [`Role`].
///
/// Role names coming from the identity provider or from query strings form an
/// open set; anything outside [`Role::ALL`] is kept as `Unrecognized` instead
/// of being dropped on the floor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoleName {
    Known(Role),
    Unrecognized(String),
}

impl RoleName {
    /// Case-insensitive lookup against the canonical role names.
    pub fn parse(name: &str) -> Self {
        Role::ALL
            .into_iter()
            .find(|role| role.name().eq_ignore_ascii_case(name))
            .map_or_else(|| RoleName::Unrecognized(name.to_string()), RoleName::Known)
    }

    pub fn known(&self) -> Option<Role> {
        match self {
            RoleName::Known(role) => Some(*role),
            RoleName::Unrecognized(_) => None,
        }
    }
}

impl From<&str> for RoleName {
    fn from(s: &str) -> Self {
        RoleName::parse(s)
    }
}

/// Maps remote role names onto domain roles.
///
/// Unknown names are skipped and duplicates collapse onto their first
/// occurrence, so the output preserves the remote ordering.
pub fn roles_from_names<I, S>(names: I) -> Vec<Role>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut roles = Vec::new();
    for name in names {
        if let Some(role) = RoleName::parse(name.as_ref()).known()
            && !roles.contains(&role)
        {
            roles.push(role);
        }
    }
    roles
}
