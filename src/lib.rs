use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};

use crate::directory::KeycloakDirectory;
use crate::models::config::ServerConfig;
use crate::routes::users::{
    assign_role, create_user, delete_user, disable_user, enable_user, get_user,
    get_user_by_email, list_admins, list_all_users, list_clients, list_users, remove_role,
    search_users, update_password, update_user,
};
use crate::routes::{json_config, query_config};

pub mod directory;
pub mod domain;
pub mod dto;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod services;

/// Registers the `/api` scope with every user endpoint.
///
/// Fixed paths are registered ahead of `/users/{id}` so they are not
/// captured as identifiers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(
            web::scope("/api")
                .service(list_users)
                .service(list_all_users)
                .service(list_admins)
                .service(list_clients)
                .service(search_users)
                .service(get_user_by_email)
                .service(create_user)
                .service(get_user)
                .service(update_user)
                .service(delete_user)
                .service(update_password)
                .service(enable_user)
                .service(disable_user)
                .service(assign_role)
                .service(remove_role),
        );
}

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
///
/// `directory` is built by the caller outside the async runtime because the
/// blocking HTTP client cannot be created on an executor thread.
pub async fn run(
    server_config: ServerConfig,
    directory: web::Data<KeycloakDirectory>,
) -> std::io::Result<()> {
    let bind_address = (server_config.address.clone(), server_config.port);

    log::info!(
        "Serving users of realm {} on {}:{}",
        server_config.keycloak.realm,
        bind_address.0,
        bind_address.1
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .app_data(directory.clone())
            .configure(configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
