//! jop-api - Catalog query service
//!
//! Read-only HTTP service over the catalog database. Serves filtered
//! episode queries, a detail lookup, and the reference tables. Run jop-etl
//! first to build the catalog.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use jop_api::{build_router, AppState};

#[derive(Parser, Debug)]
#[command(name = "jop-api", about = "Serve filtered queries over the episode catalog")]
struct Args {
    /// Catalog database file (falls back to config file, then OS default)
    #[arg(long, env = "JOP_DATABASE")]
    database: Option<PathBuf>,

    /// Listen address
    #[arg(long, default_value = "127.0.0.1:5730")]
    listen: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting jop-api v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let db_path = jop_common::config::resolve_database_path(
        args.database.as_deref().and_then(|p| p.to_str()),
    );
    info!("Database path: {}", db_path.display());

    let pool = match jop_common::db::connect_readonly(&db_path).await {
        Ok(pool) => {
            info!("Connected to database (read-only)");
            pool
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e);
        }
    };

    let state = AppState::new(pool);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    info!("jop-api listening on http://{}", args.listen);
    info!("Health check: http://{}/health", args.listen);

    axum::serve(listener, app).await?;

    Ok(())
}
