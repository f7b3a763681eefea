use controller::config::load_config;
use controller::domain::lifecycle::service::LifecycleClient;
use controller::inbound::server::{AppState, create_app};
use controller::outbound::binder::{TransportBinder, TransportLifetime};
use env_logger::Env;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let config_path = std::env::var_os("RAILYARD_CONFIG").map(PathBuf::from);
    let config = load_config(config_path.as_deref())?;

    // the server is long-lived, so every request shares one transport handle
    let binder = TransportBinder::new(config.transport()?, TransportLifetime::Persistent);
    let lifecycle_service = LifecycleClient::new(binder);

    if config.project_id.is_none() {
        warn!("RAILYARD_PROJECT_ID not defined, GET /services will be rejected");
    }
    let state = AppState {
        lifecycle_service: Arc::new(lifecycle_service),
        default_project: config.project_id.clone(),
    };

    let app = create_app(state);
    let listener = TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    info!("Server running on http://0.0.0.0:{}", config.port);
    info!("Forwarding to {}", config.graphql_api_url);
    info!("  GET    /health                          - health check");
    info!("  GET    /services                        - services of the default project");
    info!("  GET    /projects/{{project_id}}/services  - services of a project");
    info!("  GET    /services/{{service_id}}           - one service");
    info!("  POST   /services/{{service_id}}/start     - start a service");
    info!("  POST   /services/{{service_id}}/stop      - stop a service");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received shutdown signal, gracefully shutting down...");
            }
        })
        .await?;

    Ok(())
}
