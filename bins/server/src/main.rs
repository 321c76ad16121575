//! Aperture API Server
//!
//! Main entry point for the Aperture studio backend service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aperture_api::{AppState, create_router};
use aperture_db::connect;
use aperture_shared::{AppConfig, WhatsAppService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aperture=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Create the notification sender
    let notifier = WhatsAppService::new(config.notify.clone());
    info!(
        enabled = config.notify.enabled,
        api_host = config.notify.api_url.is_some(),
        "WhatsApp notifications configured"
    );

    // Create application state
    let state = AppState {
        db,
        notifier: Arc::new(notifier),
        documents: config.documents.clone(),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
