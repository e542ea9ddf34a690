use anyhow::{Context, Result};
use std::{net::SocketAddr, sync::Arc};
use storefront_discovery::{AppState, catalog::HttpCatalog, config::Settings, routes};
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file first. Ignore errors (e.g., file not found)
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_discovery=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Initializing storefront discovery service...");

    let settings = match Settings::new() {
        Ok(s) => {
            tracing::info!("Configuration loaded successfully.");
            s
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {:#}", e);
            return Err(e);
        }
    };

    let addr: SocketAddr = settings
        .server_address
        .parse()
        .with_context(|| format!("Invalid server address format: {}", settings.server_address))?;

    let catalog = HttpCatalog::from_settings(&settings)?;
    tracing::info!(
        catalog = %settings.catalog_base_url,
        page_size = settings.page_size,
        timeout_secs = settings.fetch_timeout_secs,
        "Catalogue client created."
    );

    let app_state = AppState::new(settings, Arc::new(catalog));
    let view_idle = app_state.settings.view_idle();
    app_state.views.spawn_eviction(view_idle);
    tracing::info!(idle_secs = view_idle.as_secs(), "Idle view eviction started.");
    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to address {}", addr))?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
