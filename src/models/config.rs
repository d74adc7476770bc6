//! Configuration model loaded from external sources.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub keycloak: KeycloakConfig,
}

#[derive(Clone, Debug, Deserialize)]
/// Connection settings for the Keycloak admin API.
pub struct KeycloakConfig {
    /// Base URL of the Keycloak server, e.g. `http://keycloak:8080`.
    pub server_url: String,
    /// Realm whose users are managed.
    pub realm: String,
    /// Realm the service client authenticates against; defaults to `realm`.
    #[serde(default)]
    pub auth_realm: Option<String>,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl KeycloakConfig {
    pub fn auth_realm(&self) -> &str {
        self.auth_realm.as_deref().unwrap_or(&self.realm)
    }
}
