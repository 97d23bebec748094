use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use storefront_api::app::{router, AppState};
use storefront_api::config::{self, AppConfig};
use storefront_api::database::{DatabaseManager, MemoryStore, PgStore};

#[derive(Parser, Debug)]
#[command(name = "storefront-api")]
#[command(about = "Product catalogue HTTP API")]
#[command(version)]
struct Cli {
    /// Port to listen on (overrides APP_PORT)
    #[arg(short, long, env = "STOREFRONT_PORT")]
    port: Option<u16>,

    /// Keep everything in process memory instead of PostgreSQL
    #[arg(long)]
    in_memory: bool,

    /// Apply pending migrations before serving
    #[arg(long)]
    migrate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("storefront_api=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config: AppConfig = config::config().clone();
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if config.security.jwt_secret.is_empty() {
        bail!("JWT_SECRET must be set in {:?} mode", config.environment);
    }

    tracing::info!("Starting storefront API in {:?} mode", config.environment);

    let mut pool = None;
    let state = if cli.in_memory {
        tracing::warn!("Using in-memory storage; data is lost on shutdown");
        AppState::new(config.clone(), Arc::new(MemoryStore::new()))?
    } else {
        let pg = DatabaseManager::connect(&config.database)
            .await
            .context("failed to connect to database")?;
        if cli.migrate {
            DatabaseManager::migrate(&pg).await?;
        }
        pool = Some(pg.clone());
        AppState::new(config.clone(), Arc::new(PgStore::new(pg)))?
    };

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Storefront API listening on http://{}", bind_addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pg) = pool {
        DatabaseManager::close(pg).await;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
