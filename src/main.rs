/// Space weather and satellite pass service entry point
mod clients;
mod config;
mod domain;
mod errors;
mod fixtures;
mod handlers;
mod passes;
mod risk;
mod routes;
mod scheduler;
mod services;
mod utils;

use crate::config::{AppConfig, LogFormat};
use crate::handlers::AppState;
use crate::routes::build_router;
use crate::scheduler::start_background_tasks;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = AppConfig::from_env()?;

    // Initialize logging
    init_tracing(config.log_format);
    info!(
        environment = %config.environment,
        demo_mode = config.demo_mode,
        "Configuration loaded successfully"
    );

    // Initialize clients, services and shared state
    let state = AppState::from_config(&config)?;

    // Start background tasks
    let _scheduler = start_background_tasks(&config.scheduler, state.weather_service.clone());

    // Build router
    let app = build_router(state);

    // Start server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("space_agent listening on {}", addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = FmtSubscriber::builder().with_env_filter(filter);

    let _ = match format {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
        LogFormat::Pretty => tracing::subscriber::set_global_default(builder.finish()),
    };
}
