//! Episode upsert and many-to-many link creation
//!
//! Episodes are identified by their (season, episode) pair; the store keeps
//! a run-scoped identity map so link phases never re-query episodes they
//! have already touched. Link creation is idempotent: an already-present
//! pair is a no-op.

use jop_common::Result;
use sqlx::SqlitePool;
use std::collections::HashMap;
use uuid::Uuid;

/// Canonical episode attributes for one upsert
#[derive(Debug, Clone, Default)]
pub struct EpisodeUpsert {
    pub title: String,
    pub season: i64,
    pub episode: i64,
    /// ISO calendar date, when known
    pub air_date: Option<String>,
    pub youtube_url: Option<String>,
    pub image_url: Option<String>,
}

/// Episode store with a run-scoped (season, episode) -> guid map
pub struct EpisodeStore<'a> {
    db: &'a SqlitePool,
    by_identity: HashMap<(i64, i64), String>,
}

impl<'a> EpisodeStore<'a> {
    pub fn new(db: &'a SqlitePool) -> Self {
        Self {
            db,
            by_identity: HashMap::new(),
        }
    }

    /// Upsert an episode by its (season, episode) identity
    ///
    /// The title always follows the source; nullable attributes merge with
    /// COALESCE so a source that lacks a value never erases a known one.
    pub async fn upsert(&mut self, ep: &EpisodeUpsert) -> Result<String> {
        let guid: String = sqlx::query_scalar(
            r#"
            INSERT INTO episodes (guid, title, season_number, episode_number, air_date, youtube_url, image_url)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(season_number, episode_number) DO UPDATE SET
                title = excluded.title,
                air_date = COALESCE(excluded.air_date, episodes.air_date),
                youtube_url = COALESCE(excluded.youtube_url, episodes.youtube_url),
                image_url = COALESCE(excluded.image_url, episodes.image_url),
                updated_at = CURRENT_TIMESTAMP
            RETURNING guid
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(ep.title.trim())
        .bind(ep.season)
        .bind(ep.episode)
        .bind(&ep.air_date)
        .bind(&ep.youtube_url)
        .bind(&ep.image_url)
        .fetch_one(self.db)
        .await?;

        self.by_identity.insert((ep.season, ep.episode), guid.clone());
        Ok(guid)
    }

    /// Insert an episode only if its identity is free; an existing row is
    /// left untouched and `None` is returned
    pub async fn insert_if_absent(&mut self, ep: &EpisodeUpsert) -> Result<Option<String>> {
        let guid: Option<String> = sqlx::query_scalar(
            r#"
            INSERT INTO episodes (guid, title, season_number, episode_number, air_date, youtube_url, image_url)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(season_number, episode_number) DO NOTHING
            RETURNING guid
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(ep.title.trim())
        .bind(ep.season)
        .bind(ep.episode)
        .bind(&ep.air_date)
        .bind(&ep.youtube_url)
        .bind(&ep.image_url)
        .fetch_optional(self.db)
        .await?;

        if let Some(guid) = &guid {
            self.by_identity.insert((ep.season, ep.episode), guid.clone());
        }
        Ok(guid)
    }

    /// Look up an episode guid by identity, first in the run map, then in
    /// the database (episodes upserted by a prior run)
    pub async fn lookup(&mut self, season: i64, episode: i64) -> Result<Option<String>> {
        if let Some(guid) = self.by_identity.get(&(season, episode)) {
            return Ok(Some(guid.clone()));
        }

        let guid: Option<String> = sqlx::query_scalar(
            "SELECT guid FROM episodes WHERE season_number = ? AND episode_number = ?",
        )
        .bind(season)
        .bind(episode)
        .fetch_optional(self.db)
        .await?;

        if let Some(guid) = &guid {
            self.by_identity.insert((season, episode), guid.clone());
        }
        Ok(guid)
    }
}

/// Idempotent link writers for the two many-to-many tables
pub struct RelationLinker<'a> {
    db: &'a SqlitePool,
}

impl<'a> RelationLinker<'a> {
    pub fn new(db: &'a SqlitePool) -> Self {
        Self { db }
    }

    /// Link an episode to a color; returns whether a new row was created
    pub async fn link_color(&self, episode_id: &str, color_id: &str) -> Result<bool> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO episode_colors (episode_id, color_id, is_used) VALUES (?, ?, 1)",
        )
        .bind(episode_id)
        .bind(color_id)
        .execute(self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Link an episode to a subject; returns whether a new row was created
    pub async fn link_subject(&self, episode_id: &str, subject_id: &str) -> Result<bool> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO episode_subjects (episode_id, subject_id, is_featured) VALUES (?, ?, 1)",
        )
        .bind(episode_id)
        .bind(subject_id)
        .execute(self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
