mod config;

use anyhow::Result;
use backoffice_api::{create_routes, AppState};
use backoffice_services::{
    assess_risk, compute_dashboard_stats, DataSource, JsonFileDataSource, MockDataSource,
};
use crate::config::AppConfig;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "sportsbook_backoffice=debug,backoffice_api=debug,backoffice_services=info,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting sportsbook back-office");

    let config = AppConfig::new()?;
    info!("Configuration loaded, server will bind to {}", config.server_addr());

    let source: Arc<dyn DataSource> = match &config.data.snapshot_path {
        Some(path) => {
            info!("Serving snapshot file {}", path);
            Arc::new(JsonFileDataSource::new(path))
        }
        None => {
            info!("Serving generated mock data (seed: {:?})", config.data.seed);
            Arc::new(MockDataSource::new(config.mock_data()))
        }
    };
    let state = AppState::load(source, config.api_settings()).await?;

    {
        let snapshot = state.snapshot.read().await;
        let stats = compute_dashboard_stats(&snapshot.matches, &snapshot.bets);
        let risk = assess_risk(&snapshot.matches, &snapshot.bets, state.settings.exposure_threshold);
        info!(
            "Dashboard: {} matches ({} live), {} bets, stake {}, profit {}, risk {}",
            stats.total_matches,
            stats.live_matches,
            stats.total_bets,
            stats.total_stake,
            stats.total_profit,
            stats.risk_level
        );
        info!(
            "Risk: exposure {} ({}), margin {}% ({}), {} active matches",
            risk.metrics.total_exposure,
            risk.exposure_level,
            risk.metrics.profit_margin,
            risk.margin_level,
            risk.metrics.active_matches
        );
    }

    let app = create_routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
