use serde::Deserialize;
use validator::Validate;

use crate::domain::role::Role;
use crate::domain::types::Password;
use crate::domain::user::{NewUser, UserPatch};
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Body of `POST /api/users`.
pub struct CreateUserForm {
    #[validate(length(min = 1, max = 255))]
    pub username: String,
    #[validate(email)]
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub enabled: Option<bool>,
    /// Defaults to `CLIENT` when omitted.
    pub role: Option<String>,
    pub password: Option<String>,
}

/// Validated creation request.
#[derive(Debug)]
pub struct CreateUserPayload {
    pub new_user: NewUser,
    pub password: Password,
}

impl TryFrom<CreateUserForm> for CreateUserPayload {
    type Error = FormError;

    fn try_from(mut form: CreateUserForm) -> Result<Self, Self::Error> {
        form.email = normalize_email(form.email);
        form.validate()?;

        let role = form.role.as_deref().map(parse_role).transpose()?;
        let password = parse_password(form.password)?;

        let new_user = NewUser::new(
            form.username,
            form.email,
            form.first_name,
            form.last_name,
            form.enabled,
            role,
        );
        if new_user.username.is_empty() {
            return Err(FormError::EmptyUsername);
        }

        Ok(Self { new_user, password })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Body of `PUT /api/users/{id}`; absent fields are left untouched.
pub struct UpdateUserForm {
    #[validate(length(min = 1, max = 255))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub enabled: Option<bool>,
    pub role: Option<String>,
}

impl TryFrom<UpdateUserForm> for UserPatch {
    type Error = FormError;

    fn try_from(mut form: UpdateUserForm) -> Result<Self, Self::Error> {
        form.username = form.username.map(|s| s.trim().to_string());
        if form.username.as_deref().is_some_and(str::is_empty) {
            return Err(FormError::EmptyUsername);
        }
        form.email = normalize_email(form.email);
        form.validate()?;

        Ok(UserPatch {
            username: form.username,
            email: form.email,
            first_name: form.first_name.map(|s| s.trim().to_string()),
            last_name: form.last_name.map(|s| s.trim().to_string()),
            enabled: form.enabled,
            role: form.role.as_deref().map(parse_role).transpose()?,
        })
    }
}

#[derive(Debug, Deserialize)]
/// Body of `PUT /api/users/{id}/password`.
pub struct PasswordForm {
    pub password: Option<String>,
}

impl TryFrom<PasswordForm> for Password {
    type Error = FormError;

    fn try_from(form: PasswordForm) -> Result<Self, Self::Error> {
        parse_password(form.password)
    }
}

#[derive(Debug, Deserialize)]
/// Body of `POST /api/users/{id}/roles`.
pub struct RoleForm {
    pub role: String,
}

impl TryFrom<RoleForm> for Role {
    type Error = FormError;

    fn try_from(form: RoleForm) -> Result<Self, Self::Error> {
        parse_role(&form.role)
    }
}

/// Strict role lookup: unknown names are a caller error here.
pub fn parse_role(name: &str) -> Result<Role, FormError> {
    name.trim()
        .parse()
        .map_err(|_| FormError::InvalidRole(name.to_string()))
}

fn normalize_email(email: Option<String>) -> Option<String> {
    email.map(|s| s.trim().to_lowercase())
}

fn parse_password(password: Option<String>) -> Result<Password, FormError> {
    password
        .and_then(|value| Password::new(value).ok())
        .ok_or(FormError::MissingPassword)
}
