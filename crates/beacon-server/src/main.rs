//! Main entry point for the Beacon server.

use std::sync::Arc;

use beacon_persistence::{ExternalDbPersistService, PersistenceService, create_schema};
use beacon_release::ArtifactStore;
use beacon_server::{
    model::{AppState, Configuration},
    startup,
};
use tracing::info;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let configuration = Configuration::new()?;

    let logging_config = configuration.logging_config();
    let _logging_guard = startup::init_logging(&logging_config)?;

    configuration.validate()?;

    let database_connection = configuration.database_connection().await?;
    if configuration.auto_migrate() {
        create_schema(&database_connection).await?;
        info!("Database schema ready");
    }
    let persistence: Arc<dyn PersistenceService> =
        Arc::new(ExternalDbPersistService::new(database_connection));

    let artifact_store = Arc::new(ArtifactStore::new(
        configuration.artifact_dir(),
        &configuration.artifact_url_prefix(),
        configuration.artifact_max_file_size(),
    ));
    artifact_store.init().await?;

    let server_address = configuration.server_address();
    let server_port = configuration.server_port();
    let context_path = configuration.server_context_path();

    if !configuration.auth_enabled() {
        tracing::warn!(
            actor = %configuration.default_actor(),
            "Authentication is disabled, all requests act as the default actor"
        );
    }

    let app_state = Arc::new(AppState::new(configuration, persistence, artifact_store));

    info!(
        address = %server_address,
        port = server_port,
        context_path = %context_path,
        "Starting Beacon server"
    );

    startup::http_server(app_state, context_path, server_address, server_port)?.await?;

    Ok(())
}
