//! Filter query engine
//!
//! `builder` renders a typed filter plan into parameterized SQL; `project`
//! shapes the aggregated rows into episode views. Execution lives here so
//! handlers deal only in plans and views.

pub mod builder;
pub mod project;

pub use builder::{Combine, EpisodeQuery, SqlArg, SqlPlan};

use jop_common::db::models::EpisodeView;
use sqlx::SqlitePool;

/// Execute a filter plan and project the matching episodes
pub async fn fetch_episodes(
    db: &SqlitePool,
    query: &EpisodeQuery,
) -> Result<Vec<EpisodeView>, sqlx::Error> {
    let plan = query.build();
    let rows = bind_args(sqlx::query(&plan.sql), &plan.args)
        .fetch_all(db)
        .await?;
    Ok(rows.iter().map(project::view_from_row).collect())
}

/// Fetch a single episode view by its (season, episode) identity
pub async fn fetch_episode(
    db: &SqlitePool,
    season: i64,
    episode: i64,
) -> Result<Option<EpisodeView>, sqlx::Error> {
    let plan = builder::detail_plan(season, episode);
    let row = bind_args(sqlx::query(&plan.sql), &plan.args)
        .fetch_optional(db)
        .await?;
    Ok(row.as_ref().map(project::view_from_row))
}

fn bind_args<'q>(
    mut query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    args: &'q [SqlArg],
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    for arg in args {
        query = match arg {
            SqlArg::Int(value) => query.bind(*value),
            SqlArg::Text(value) => query.bind(value.as_str()),
        };
    }
    query
}
