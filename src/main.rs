use anyhow::Result;
use tokio::net::TcpListener;

use acs_email_service::config::Settings;
use acs_email_service::server::{create_app, AppState};
use acs_email_service::shutdown;
use acs_email_service::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::new()?;

    // Initialize tracing
    init_tracing(&settings.log);
    tracing::info!("Configuration loaded");

    let root = shutdown::install();

    // Create application state
    let state = AppState::new(settings.clone(), root.clone())?;
    tracing::info!(
        templates = state.dispatcher.templates().len(),
        provider = state.dispatcher.provider_name(),
        default_sender = settings.default_sender().is_some(),
        "Application state initialized"
    );

    // Create Axum app
    let app = create_app(state);

    // Start server
    let addr = settings.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::on_cancel(root))
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
