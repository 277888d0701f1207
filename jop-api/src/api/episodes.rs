//! Episode list and detail endpoints
//!
//! The list endpoint accepts repeated `month`, `color`, and `subject`
//! query parameters plus a `filter_type` of `AND` or `OR` (default `AND`),
//! or an equivalent structured POST body. The detail endpoint looks up a
//! single episode by its (season, episode) identity.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::query::{self, Combine, EpisodeQuery};
use crate::AppState;
use jop_common::db::models::EpisodeView;

/// Structured POST body for the list endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ListRequest {
    #[serde(default)]
    pub filters: FilterSpec,
    #[serde(default)]
    pub filter_type: Option<String>,
}

/// Filter criteria of a structured list request
#[derive(Debug, Default, Deserialize)]
pub struct FilterSpec {
    #[serde(default)]
    pub months: Vec<u32>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
}

/// GET /api/episodes?month=1&color=Black&subject=Tree&filter_type=AND
///
/// Query parameters may repeat; each occurrence adds one requested value
/// to its dimension.
pub async fn list_episodes(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<EpisodeView>>, EpisodeError> {
    let query = query_from_params(&params)?;
    let episodes = query::fetch_episodes(&state.db, &query)
        .await
        .map_err(|e| EpisodeError::DatabaseError(e.to_string()))?;
    Ok(Json(episodes))
}

/// POST /api/episodes with a JSON filter body
pub async fn list_episodes_body(
    State(state): State<AppState>,
    Json(request): Json<ListRequest>,
) -> Result<Json<Vec<EpisodeView>>, EpisodeError> {
    let combine = match request.filter_type.as_deref() {
        None => Combine::default(),
        Some(raw) => {
            Combine::parse(raw).ok_or_else(|| EpisodeError::InvalidFilterType(raw.to_string()))?
        }
    };

    let query = EpisodeQuery {
        months: request.filters.months,
        colors: request.filters.colors,
        subjects: request.filters.subjects,
        combine,
    };
    let episodes = query::fetch_episodes(&state.db, &query)
        .await
        .map_err(|e| EpisodeError::DatabaseError(e.to_string()))?;
    Ok(Json(episodes))
}

/// GET /api/episodes/:season/:episode
pub async fn episode_detail(
    State(state): State<AppState>,
    Path((season, episode)): Path<(i64, i64)>,
) -> Result<Json<EpisodeView>, EpisodeError> {
    let view = query::fetch_episode(&state.db, season, episode)
        .await
        .map_err(|e| EpisodeError::DatabaseError(e.to_string()))?;

    match view {
        Some(view) => Ok(Json(view)),
        None => Err(EpisodeError::NotFound),
    }
}

/// Assemble a filter query from repeated GET parameters
fn query_from_params(params: &[(String, String)]) -> Result<EpisodeQuery, EpisodeError> {
    let mut query = EpisodeQuery::default();

    for (key, value) in params {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key.as_str() {
            "month" => {
                let month = value
                    .parse::<u32>()
                    .map_err(|_| EpisodeError::InvalidMonth(value.to_string()))?;
                query.months.push(month);
            }
            "color" => query.colors.push(value.to_string()),
            "subject" => query.subjects.push(value.to_string()),
            "filter_type" => {
                query.combine = Combine::parse(value)
                    .ok_or_else(|| EpisodeError::InvalidFilterType(value.to_string()))?;
            }
            // Unknown parameters are ignored
            _ => {}
        }
    }

    Ok(query)
}

/// Episode endpoint errors
#[derive(Debug)]
pub enum EpisodeError {
    InvalidMonth(String),
    InvalidFilterType(String),
    NotFound,
    DatabaseError(String),
}

impl IntoResponse for EpisodeError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            EpisodeError::InvalidMonth(value) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid month (must be an integer): {}", value),
            ),
            EpisodeError::InvalidFilterType(value) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid filter_type (must be AND or OR): {}", value),
            ),
            EpisodeError::NotFound => (StatusCode::NOT_FOUND, "Episode not found".to_string()),
            EpisodeError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn repeated_parameters_accumulate() {
        let query = query_from_params(&params(&[
            ("month", "1"),
            ("month", "12"),
            ("color", "Black"),
            ("subject", "Tree"),
        ]))
        .unwrap();

        assert_eq!(query.months, vec![1, 12]);
        assert_eq!(query.colors, vec!["Black".to_string()]);
        assert_eq!(query.subjects, vec!["Tree".to_string()]);
        assert_eq!(query.combine, Combine::All);
    }

    #[test]
    fn filter_type_or_selects_any() {
        let query = query_from_params(&params(&[("filter_type", "OR")])).unwrap();
        assert_eq!(query.combine, Combine::Any);
    }

    #[test]
    fn invalid_month_is_rejected() {
        let result = query_from_params(&params(&[("month", "January")]));
        assert!(matches!(result, Err(EpisodeError::InvalidMonth(_))));
    }

    #[test]
    fn invalid_filter_type_is_rejected() {
        let result = query_from_params(&params(&[("filter_type", "MAYBE")]));
        assert!(matches!(result, Err(EpisodeError::InvalidFilterType(_))));
    }

    #[test]
    fn empty_values_are_ignored() {
        let query = query_from_params(&params(&[("color", ""), ("month", " ")])).unwrap();
        assert!(query.colors.is_empty());
        assert!(query.months.is_empty());
    }
}
