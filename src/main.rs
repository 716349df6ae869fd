use anyhow::Context;
use clap::Parser;

use devconnector_api::auth::JwtKeys;
use devconnector_api::database::DatabaseManager;
use devconnector_api::{app, config, AppState};

#[derive(Parser)]
#[command(name = "devconnector-api")]
#[command(about = "DevConnector HTTP API server")]
#[command(version)]
struct Args {
    #[arg(long, help = "Keep everything in memory instead of PostgreSQL")]
    memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    devconnector_api::init_tracing();

    let args = Args::parse();
    let config = config::config();
    tracing::info!("Starting DevConnector API in {:?} mode", config.environment);

    let keys = JwtKeys::from_config(&config.security).context("JWT_SECRET must be set")?;

    let state = if args.memory {
        tracing::warn!("Using in-memory repositories; data is lost on exit");
        AppState::in_memory(keys)
    } else {
        let pool = DatabaseManager::connect(&config.database).await?;
        DatabaseManager::ensure_schema(&pool).await?;
        AppState::postgres(pool, keys)
    };

    let bind_addr = format!("{}:{}", config.server.bind_host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("DevConnector API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutting down");
}
