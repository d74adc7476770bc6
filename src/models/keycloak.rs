//! Wire representations of the Keycloak admin REST API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::role::roles_from_names;
use crate::domain::types::{Password, TypeConstraintError, UserId};
use crate::domain::user::{NewUser, User};

/// `UserRepresentation` as returned by `/admin/realms/{realm}/users`.
///
/// Attributes this service does not model are kept in `extra` so a
/// fetch-modify-update cycle sends them back untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRepresentation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Vec<CredentialRepresentation>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRepresentation {
    /// Builds the creation payload carrying the initial password.
    pub fn for_creation(new_user: &NewUser, password: &Password) -> Self {
        Self {
            username: Some(new_user.username.clone()),
            email: new_user.email.clone(),
            first_name: new_user.first_name.clone(),
            last_name: new_user.last_name.clone(),
            enabled: Some(new_user.enabled),
            email_verified: Some(true),
            credentials: Some(vec![CredentialRepresentation::password(password)]),
            ..Self::default()
        }
    }

    /// Overwrites the mutable attributes with the values held by `user`.
    pub fn apply_user(&mut self, user: &User) {
        self.username = Some(user.username.clone());
        self.email = user.email.clone();
        self.first_name = user.first_name.clone();
        self.last_name = user.last_name.clone();
        self.enabled = Some(user.enabled);
    }

    /// Projects the representation onto a domain [`User`].
    ///
    /// Role names outside the known set are dropped.
    pub fn into_user<I, S>(self, role_names: I) -> Result<User, TypeConstraintError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let id = UserId::new(self.id.unwrap_or_default())?;
        let user = User::new(
            id,
            self.username.unwrap_or_default(),
            self.email,
            self.first_name,
            self.last_name,
            self.enabled.unwrap_or(false),
        );
        Ok(user.with_roles(roles_from_names(role_names)))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRepresentation {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    pub temporary: bool,
}

impl CredentialRepresentation {
    /// Non-temporary password credential.
    pub fn password(password: &Password) -> Self {
        Self {
            kind: "password".to_string(),
            value: password.expose().to_string(),
            temporary: false,
        }
    }
}

/// Realm role; role-mapping endpoints expect the full object back.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoleRepresentation {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Subset of the OpenID Connect token endpoint response.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}
