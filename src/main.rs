use std::env;

use actix_web::web;
use config::Config;
use dotenvy::dotenv;

use micromall_users::directory::KeycloakDirectory;
use micromall_users::models::config::ServerConfig;
use micromall_users::run;

fn main() -> std::io::Result<()> {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        // Add `./config/default.yaml`
        .add_source(config::File::with_name("config/default"))
        // Add environment-specific overrides
        .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
        // Add settings from the environment, e.g. `APP_KEYCLOAK__CLIENT_SECRET`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build();

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Error loading settings: {err}");
            std::process::exit(1);
        }
    };

    let server_config = match settings.try_deserialize::<ServerConfig>() {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Error loading server config: {err}");
            std::process::exit(1);
        }
    };

    // The blocking client must exist before the async runtime starts.
    let directory = match KeycloakDirectory::new(&server_config.keycloak) {
        Ok(directory) => web::Data::new(directory),
        Err(err) => {
            log::error!("Error creating Keycloak directory: {err}");
            std::process::exit(1);
        }
    };

    actix_web::rt::System::new().block_on(run(server_config, directory.clone()))
}
