//! jop-etl - Catalog ingestion pipeline
//!
//! Normalizes the three Joy of Painting source files (episode/date list,
//! colors-used table, subject-matter table) into the catalog database.
//! Safe to re-run: ingestion is idempotent over unchanged sources.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use jop_etl::{run_pipeline, SourceSet};

#[derive(Parser, Debug)]
#[command(name = "jop-etl", about = "Ingest Joy of Painting sources into the catalog database")]
struct Args {
    /// Catalog database file (falls back to config file, then OS default)
    #[arg(long, env = "JOP_DATABASE")]
    database: Option<PathBuf>,

    /// Directory containing the source files
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Episode/date list (defaults to <data-dir>/episode_dates.csv)
    #[arg(long)]
    episode_dates: Option<PathBuf>,

    /// Colors-used table (defaults to <data-dir>/colors_used.csv)
    #[arg(long)]
    colors_used: Option<PathBuf>,

    /// Subject-matter table (defaults to <data-dir>/subject_matter.csv)
    #[arg(long)]
    subject_matter: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting jop-etl v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let db_path = jop_common::config::resolve_database_path(
        args.database.as_deref().and_then(|p| p.to_str()),
    );
    info!("Database path: {}", db_path.display());

    let pool = jop_common::db::init_database(&db_path)
        .await
        .context("Failed to initialize catalog database")?;

    let sources = SourceSet {
        episode_dates: read_source(
            args.episode_dates
                .unwrap_or_else(|| args.data_dir.join("episode_dates.csv")),
        )?,
        colors_used: read_source(
            args.colors_used
                .unwrap_or_else(|| args.data_dir.join("colors_used.csv")),
        )?,
        subject_matter: read_source(
            args.subject_matter
                .unwrap_or_else(|| args.data_dir.join("subject_matter.csv")),
        )?,
    };

    let stats = run_pipeline(&pool, &sources).await?;

    info!(
        colors = stats.colors_resolved,
        subjects = stats.subjects_resolved,
        episodes = stats.episodes_upserted + stats.episodes_appended,
        color_links = stats.color_links_created,
        subject_links = stats.subject_links_created,
        "Ingestion complete"
    );
    if stats.episode_lines_skipped + stats.colors_rows_skipped + stats.subject_rows_skipped > 0 {
        info!(
            episode_lines = stats.episode_lines_skipped,
            colors_rows = stats.colors_rows_skipped,
            subject_rows = stats.subject_rows_skipped,
            "Some source records were skipped; see warnings above"
        );
    }

    Ok(())
}

fn read_source(path: PathBuf) -> Result<String> {
    std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read source file: {}", path.display()))
}
