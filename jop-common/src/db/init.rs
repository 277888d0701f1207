//! Database initialization
//!
//! Creates the catalog schema on first run. All statements are idempotent,
//! so init is safe to call on every startup.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use sqlite options to create database if it doesn't exist
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    configure_connection(&pool).await?;
    create_schema(&pool).await?;

    Ok(pool)
}

/// Apply connection pragmas (foreign keys, WAL, busy timeout)
async fn configure_connection(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;

    // WAL allows the query service to read while an ingestion run writes
    sqlx::query("PRAGMA journal_mode = WAL").execute(pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(pool).await?;

    Ok(())
}

/// Create all catalog tables (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_episodes_table(pool).await?;
    create_colors_table(pool).await?;
    create_subjects_table(pool).await?;

    // Linking tables
    create_episode_colors_table(pool).await?;
    create_episode_subjects_table(pool).await?;

    Ok(())
}

/// Create the episodes table
///
/// Episode identity is the (season_number, episode_number) pair; the guid is
/// a surrogate key referenced by the link tables. air_date is an ISO-8601
/// calendar date string, nullable for episodes whose broadcast date is
/// unknown.
pub async fn create_episodes_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS episodes (
            guid TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            season_number INTEGER NOT NULL,
            episode_number INTEGER NOT NULL,
            air_date TEXT,
            youtube_url TEXT,
            image_url TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (season_number, episode_number),
            CHECK (season_number >= 0),
            CHECK (episode_number >= 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_episodes_title ON episodes(title)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_episodes_air_date ON episodes(air_date)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the colors table
///
/// Color identity is the exact trimmed name. hex_code follows
/// last-write-wins on re-ingestion while the guid stays stable.
pub async fn create_colors_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS colors (
            guid TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            hex_code TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_colors_name ON colors(name)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the subjects table
///
/// Subject identity is the canonical name (underscores expanded,
/// title-cased). Rows are insert-if-absent and never updated.
pub async fn create_subjects_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS subjects (
            guid TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_subjects_name ON subjects(name)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_episode_colors_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS episode_colors (
            episode_id TEXT NOT NULL REFERENCES episodes(guid) ON DELETE CASCADE,
            color_id TEXT NOT NULL REFERENCES colors(guid) ON DELETE CASCADE,
            is_used INTEGER NOT NULL DEFAULT 1,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (episode_id, color_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_episode_colors_episode ON episode_colors(episode_id)",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_episode_colors_color ON episode_colors(color_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_episode_subjects_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS episode_subjects (
            episode_id TEXT NOT NULL REFERENCES episodes(guid) ON DELETE CASCADE,
            subject_id TEXT NOT NULL REFERENCES subjects(guid) ON DELETE CASCADE,
            is_featured INTEGER NOT NULL DEFAULT 1,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (episode_id, subject_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_episode_subjects_episode ON episode_subjects(episode_id)",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_episode_subjects_subject ON episode_subjects(subject_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
