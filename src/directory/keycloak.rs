//! Keycloak admin REST implementation of the directory traits.
//!
//! Every public operation authenticates with the client-credentials grant
//! once and reuses that token for the remote calls it makes. Nothing is
//! cached between operations and failed calls are never retried.

use std::time::Duration;

use reqwest::Method;
use reqwest::StatusCode;
use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::LOCATION;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::directory::errors::{DirectoryError, DirectoryResult};
use crate::directory::{RoleWriter, UserReader, UserSearchQuery, UserWriter};
use crate::domain::role::Role;
use crate::domain::types::{Password, UserId};
use crate::domain::user::{NewUser, User};
use crate::models::config::KeycloakConfig;
use crate::models::keycloak::{
    CredentialRepresentation, RoleRepresentation, TokenResponse, UserRepresentation,
};

/// Batch size used when a listing has to walk the whole user set.
const FETCH_BATCH_SIZE: usize = 100;

/// Directory backed by a Keycloak realm.
#[derive(Clone, Debug)]
pub struct KeycloakDirectory {
    client: Client,
    server_url: Url,
    realm: String,
    auth_realm: String,
    client_id: String,
    client_secret: String,
}

impl KeycloakDirectory {
    /// Builds the directory with a blocking HTTP client.
    ///
    /// Must not be called from within an async executor thread.
    pub fn new(config: &KeycloakConfig) -> DirectoryResult<Self> {
        let server_url = Url::parse(&config.server_url)
            .map_err(|e| DirectoryError::InvalidConfig(format!("server_url: {e}")))?;
        if server_url.cannot_be_a_base() {
            return Err(DirectoryError::InvalidConfig(format!(
                "server_url cannot be a base: {server_url}"
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            server_url,
            realm: config.realm.clone(),
            auth_realm: config.auth_realm().to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        })
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.server_url.clone();
        // `new` rejects URLs that cannot be a base.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn admin_url(&self, segments: &[&str]) -> Url {
        let mut full = vec!["admin", "realms", self.realm.as_str()];
        full.extend_from_slice(segments);
        self.url(&full)
    }

    /// Obtains a service-account token for one directory operation.
    fn session(&self) -> DirectoryResult<Session<'_>> {
        let token_url = self.url(&[
            "realms",
            self.auth_realm.as_str(),
            "protocol",
            "openid-connect",
            "token",
        ]);

        let response = self
            .client
            .post(token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let message = error_message(response);
            log::error!("Keycloak token request failed with status {status}: {message}");
            return Err(DirectoryError::Authentication(message));
        }

        let token: TokenResponse = response.json()?;
        Ok(Session {
            directory: self,
            token: token.access_token,
        })
    }
}

/// Authenticated view of the directory for the duration of one operation.
struct Session<'a> {
    directory: &'a KeycloakDirectory,
    token: String,
}

impl Session<'_> {
    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.directory
            .client
            .request(method, self.directory.admin_url(segments))
            .bearer_auth(&self.token)
    }

    fn user_representation(&self, id: &UserId) -> DirectoryResult<UserRepresentation> {
        let response = self.request(Method::GET, &["users", id.as_str()]).send()?;
        json(expect_success(response, || {
            DirectoryError::user_not_found(id.as_str())
        })?)
    }

    /// Names of the realm roles the user holds, composites included.
    fn effective_role_names(&self, id: &str) -> DirectoryResult<Vec<String>> {
        let response = self
            .request(
                Method::GET,
                &["users", id, "role-mappings", "realm", "composite"],
            )
            .send()?;
        let roles: Vec<RoleRepresentation> =
            json(expect_success(response, || DirectoryError::user_not_found(id))?)?;
        Ok(roles.into_iter().map(|role| role.name).collect())
    }

    /// Converts a representation, resolving the user's roles remotely.
    fn to_user(&self, representation: UserRepresentation) -> DirectoryResult<User> {
        let Some(id) = representation.id.as_deref() else {
            return Err(DirectoryError::InvalidResponse(
                "user representation without id".to_string(),
            ));
        };
        let role_names = self.effective_role_names(id)?;
        Ok(representation.into_user(role_names)?)
    }

    fn to_users(&self, representations: Vec<UserRepresentation>) -> DirectoryResult<Vec<User>> {
        representations
            .into_iter()
            .map(|representation| self.to_user(representation))
            .collect()
    }

    fn put_user(&self, id: &UserId, representation: &UserRepresentation) -> DirectoryResult<()> {
        let response = self
            .request(Method::PUT, &["users", id.as_str()])
            .json(representation)
            .send()?;
        expect_success(response, || DirectoryError::user_not_found(id.as_str()))?;
        Ok(())
    }

    fn realm_role(&self, role: Role) -> DirectoryResult<RoleRepresentation> {
        let response = self.request(Method::GET, &["roles", role.name()]).send()?;
        json(expect_success(response, || {
            DirectoryError::RoleNotFound(role.name().to_string())
        })?)
    }

    /// Roles mapped directly on the user, without composites.
    fn direct_roles(&self, id: &UserId) -> DirectoryResult<Vec<RoleRepresentation>> {
        let response = self
            .request(Method::GET, &["users", id.as_str(), "role-mappings", "realm"])
            .send()?;
        json(expect_success(response, || {
            DirectoryError::user_not_found(id.as_str())
        })?)
    }

    fn change_role_mappings(
        &self,
        method: Method,
        id: &UserId,
        roles: &[RoleRepresentation],
    ) -> DirectoryResult<()> {
        if roles.is_empty() {
            return Ok(());
        }
        let response = self
            .request(method, &["users", id.as_str(), "role-mappings", "realm"])
            .json(roles)
            .send()?;
        expect_success(response, || DirectoryError::user_not_found(id.as_str()))?;
        Ok(())
    }

    fn fetch_users(&self, query: &UserSearchQuery) -> DirectoryResult<Vec<UserRepresentation>> {
        if let Some(pagination) = &query.pagination {
            return self.fetch_user_window(query.search.as_deref(), pagination.first, pagination.max);
        }

        let mut users = Vec::new();
        loop {
            let batch =
                self.fetch_user_window(query.search.as_deref(), users.len(), FETCH_BATCH_SIZE)?;
            let exhausted = batch.len() < FETCH_BATCH_SIZE;
            users.extend(batch);
            if exhausted {
                return Ok(users);
            }
        }
    }

    fn fetch_user_window(
        &self,
        search: Option<&str>,
        first: usize,
        max: usize,
    ) -> DirectoryResult<Vec<UserRepresentation>> {
        let mut request = self
            .request(Method::GET, &["users"])
            .query(&[("first", first), ("max", max)]);
        if let Some(search) = search {
            request = request.query(&[("search", search)]);
        }
        json(error_for_status(request.send()?)?)
    }
}

impl UserReader for KeycloakDirectory {
    fn list_all_users(&self) -> DirectoryResult<Vec<User>> {
        self.search_users(&UserSearchQuery::default())
    }

    fn get_user_by_id(&self, id: &UserId) -> DirectoryResult<User> {
        let session = self.session()?;
        let representation = session.user_representation(id)?;
        session.to_user(representation)
    }

    fn get_user_by_email(&self, email: &str) -> DirectoryResult<User> {
        let session = self.session()?;
        let response = session
            .request(Method::GET, &["users"])
            .query(&[("email", email), ("exact", "true"), ("first", "0"), ("max", "2")])
            .send()?;
        let mut matches: Vec<UserRepresentation> = json(error_for_status(response)?)?;

        if matches.len() > 1 {
            log::warn!("Several users share the email {email}; using the first match");
        }
        if matches.is_empty() {
            return Err(DirectoryError::email_not_found(email));
        }
        session.to_user(matches.swap_remove(0))
    }

    fn search_users(&self, query: &UserSearchQuery) -> DirectoryResult<Vec<User>> {
        let session = self.session()?;
        let representations = session.fetch_users(query)?;
        session.to_users(representations)
    }

    fn count_users(&self, query: &UserSearchQuery) -> DirectoryResult<usize> {
        let session = self.session()?;
        let mut request = session.request(Method::GET, &["users", "count"]);
        if let Some(search) = &query.search {
            request = request.query(&[("search", search.as_str())]);
        }
        json(error_for_status(request.send()?)?)
    }
}

impl UserWriter for KeycloakDirectory {
    fn create_user(&self, new_user: &NewUser, password: &Password) -> DirectoryResult<User> {
        let session = self.session()?;
        let representation = UserRepresentation::for_creation(new_user, password);

        let response = session
            .request(Method::POST, &["users"])
            .json(&representation)
            .send()?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let reason = error_message(response);
            log::error!("Keycloak refused to create user {}: {status} {reason}", new_user.username);
            return Err(DirectoryError::CreationFailed {
                status: status.as_u16(),
                reason,
            });
        }

        let id = created_user_id(&response)?;
        log::info!("Created user {} with id {id}", new_user.username);

        // Creation is not rolled back when the role cannot be assigned.
        session
            .realm_role(new_user.role)
            .and_then(|role| session.change_role_mappings(Method::POST, &id, &[role]))
            .inspect_err(|err| {
                log::error!("User {id} was created but role assignment failed: {err}");
            })?;

        Ok(User::new(
            id,
            new_user.username.clone(),
            new_user.email.clone(),
            new_user.first_name.clone(),
            new_user.last_name.clone(),
            new_user.enabled,
        )
        .with_roles([new_user.role]))
    }

    fn update_user(&self, user: &User) -> DirectoryResult<User> {
        let session = self.session()?;

        let mut representation = session.user_representation(&user.id)?;
        representation.apply_user(user);
        session.put_user(&user.id, &representation)?;

        if !user.roles().is_empty() {
            log::info!("Replacing roles of user {} with {:?}", user.id, user.role_names());
            let current = session.direct_roles(&user.id)?;
            session.change_role_mappings(Method::DELETE, &user.id, &current)?;

            let requested = user
                .roles()
                .iter()
                .map(|role| session.realm_role(*role))
                .collect::<DirectoryResult<Vec<_>>>()?;
            session.change_role_mappings(Method::POST, &user.id, &requested)?;
        }

        let refreshed = session.user_representation(&user.id)?;
        session.to_user(refreshed)
    }

    fn delete_user(&self, id: &UserId) -> DirectoryResult<()> {
        let session = self.session()?;
        let response = session
            .request(Method::DELETE, &["users", id.as_str()])
            .send()?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(()),
            StatusCode::NOT_FOUND => Err(DirectoryError::user_not_found(id.as_str())),
            status => Err(DirectoryError::DeletionFailed(status.as_u16())),
        }
    }

    fn reset_password(&self, id: &UserId, password: &Password) -> DirectoryResult<()> {
        let session = self.session()?;
        let response = session
            .request(Method::PUT, &["users", id.as_str(), "reset-password"])
            .json(&CredentialRepresentation::password(password))
            .send()?;
        expect_success(response, || DirectoryError::user_not_found(id.as_str()))?;
        Ok(())
    }

    fn set_user_enabled(&self, id: &UserId, enabled: bool) -> DirectoryResult<()> {
        let session = self.session()?;
        let mut representation = session.user_representation(id)?;
        representation.enabled = Some(enabled);
        session.put_user(id, &representation)
    }
}

impl RoleWriter for KeycloakDirectory {
    fn assign_role(&self, id: &UserId, role: Role) -> DirectoryResult<()> {
        let session = self.session()?;
        let role = session.realm_role(role)?;
        session.change_role_mappings(Method::POST, id, &[role])
    }

    fn remove_role(&self, id: &UserId, role: Role) -> DirectoryResult<()> {
        let session = self.session()?;
        let role = session.realm_role(role)?;
        session.change_role_mappings(Method::DELETE, id, &[role])
    }
}

/// Extracts the new identity from the `Location` header of a 201 response.
fn created_user_id(response: &Response) -> DirectoryResult<UserId> {
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            DirectoryError::InvalidResponse("created user without Location header".to_string())
        })?;

    let id = location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    Ok(UserId::new(id)?)
}

fn json<T: DeserializeOwned>(response: Response) -> DirectoryResult<T> {
    Ok(response.json()?)
}

fn error_for_status(response: Response) -> DirectoryResult<Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        let status = response.status();
        Err(DirectoryError::remote(status, error_message(response)))
    }
}

/// Like [`error_for_status`], but maps a 404 through `not_found`.
fn expect_success(
    response: Response,
    not_found: impl FnOnce() -> DirectoryError,
) -> DirectoryResult<Response> {
    if response.status() == StatusCode::NOT_FOUND {
        return Err(not_found());
    }
    error_for_status(response)
}

/// Best-effort human readable reason of a failed Keycloak response.
fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().unwrap_or_default();

    serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|value| {
            ["errorMessage", "error_description", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .or_else(|| {
            let body = body.trim();
            (!body.is_empty()).then(|| body.to_string())
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string())
}
