//! Shared helpers: a mocked Keycloak server and an in-process API.
//!
//! httpmock's blocking API must not run inside the actix runtime, so mocks
//! are registered before [`call`] and asserted after it returns.

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use httpmock::prelude::*;
use serde_json::{Value, json};

use micromall_users::configure;
use micromall_users::directory::KeycloakDirectory;
use micromall_users::models::config::KeycloakConfig;

pub const USERS: &str = "/admin/realms/micromall/users";

pub struct TestKeycloak {
    pub server: MockServer,
    pub directory: web::Data<KeycloakDirectory>,
}

impl TestKeycloak {
    /// Starts a mock realm `micromall` that hands out tokens to anyone.
    pub fn start() -> Self {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/realms/micromall/protocol/openid-connect/token");
            then.status(200)
                .json_body(json!({"access_token": "test-token", "expires_in": 300}));
        });
        let directory = directory(&server.base_url());
        Self { server, directory }
    }

    /// Serves `users` for an unpaginated listing and their role mappings.
    pub fn mock_listing(&self, users: &[(&str, &str, bool, &str)]) {
        let body: Vec<Value> = users
            .iter()
            .map(|(id, username, enabled, _)| {
                json!({"id": id, "username": username, "enabled": enabled})
            })
            .collect();
        self.server.mock(|when, then| {
            when.method(GET)
                .path(USERS)
                .query_param("first", "0")
                .query_param("max", "100");
            then.status(200).json_body(json!(body));
        });
        for (id, _, _, role) in users {
            self.mock_roles(id, &[*role]);
        }
    }

    pub fn mock_roles(&self, id: &str, roles: &[&str]) {
        let body: Vec<Value> = roles.iter().map(|name| json!({"name": name})).collect();
        self.server.mock(|when, then| {
            when.method(GET)
                .path(format!("{USERS}/{id}/role-mappings/realm/composite"));
            then.status(200).json_body(json!(body));
        });
    }

    pub fn mock_count(&self, total: usize) {
        self.server.mock(|when, then| {
            when.method(GET).path(format!("{USERS}/count"));
            then.status(200).body(total.to_string());
        });
    }
}

pub fn directory(server_url: &str) -> web::Data<KeycloakDirectory> {
    let config = KeycloakConfig {
        server_url: server_url.to_string(),
        realm: "micromall".to_string(),
        auth_realm: None,
        client_id: "user-api".to_string(),
        client_secret: "secret".to_string(),
        timeout_secs: 2,
    };
    web::Data::new(KeycloakDirectory::new(&config).unwrap())
}

/// Sends `req` through the API and returns the status and JSON body.
///
/// An empty body is returned as `Value::Null`.
pub fn call(
    directory: &web::Data<KeycloakDirectory>,
    req: test::TestRequest,
) -> (StatusCode, Value) {
    actix_web::rt::System::new().block_on(async {
        let app = test::init_service(
            App::new()
                .app_data(directory.clone())
                .configure(configure),
        )
        .await;

        let resp = test::call_service(&app, req.to_request()).await;
        let status = resp.status();
        let body = test::read_body(resp).await;
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    })
}
