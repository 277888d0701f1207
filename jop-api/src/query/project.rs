//! Result projection
//!
//! Shapes raw aggregated rows into flat episode views: the concatenated
//! name lists are split, trimmed, and de-duplicated, and aggregation
//! placeholders for association-free episodes collapse to empty lists.

use jop_common::db::models::EpisodeView;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::collections::HashSet;

/// Project one aggregated row into an episode view
pub fn view_from_row(row: &SqliteRow) -> EpisodeView {
    EpisodeView {
        id: row.get("guid"),
        title: row.get("title"),
        season: row.get("season_number"),
        episode: row.get("episode_number"),
        air_date: row.get("air_date"),
        youtube_url: row.get("youtube_url"),
        image_url: row.get("image_url"),
        colors: split_names(row.get("color_names")),
        subjects: split_names(row.get("subject_names")),
    }
}

/// Split an aggregated name list, dropping placeholders and duplicates
pub fn split_names(aggregated: Option<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for part in aggregated.unwrap_or_default().split(',') {
        let name = part.trim();
        if !name.is_empty() && seen.insert(name.to_string()) {
            names.push(name.to_string());
        }
    }

    names
}
