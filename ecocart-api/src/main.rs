use std::net::SocketAddr;
use anyhow::Context;
use ecocart_api::{app, AppState};
use ecocart_store::session_store::run_idle_sweeper;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ecocart_api=debug,ecocart_pricing=debug,ecocart_store=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ecocart_store::Config::load().context("Failed to load config")?;
    tracing::info!("Starting EcoCart API on port {}", config.server.port);

    let app_state = AppState::from_config(&config)?;
    tracing::info!(
        suggester = app_state.pricing.suggester_name(),
        fallback = ?app_state.pricing.fallback(),
        "Pricing service ready"
    );

    tokio::spawn(run_idle_sweeper(app_state.sessions.clone()));

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}
