//! Database models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub guid: String,
    pub title: String,
    pub season_number: i64,
    pub episode_number: i64,
    pub air_date: Option<String>,
    pub youtube_url: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Color {
    pub id: String,
    pub name: String,
    pub hex_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
}

/// Flat per-episode view served by the query endpoints
///
/// Colors and subjects are de-duplicated name lists; order is not
/// significant. air_date serializes as an ISO calendar date, omitted when
/// the broadcast date is unknown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EpisodeView {
    pub id: String,
    pub title: String,
    pub season: i64,
    pub episode: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub air_date: Option<String>,
    pub youtube_url: Option<String>,
    pub image_url: Option<String>,
    pub colors: Vec<String>,
    pub subjects: Vec<String>,
}
