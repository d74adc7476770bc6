//! Configuration and Keycloak wire models.

pub mod config;
pub mod keycloak;
