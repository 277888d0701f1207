//! Reference lookup endpoints: colors, subjects, months

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::AppState;
use jop_common::db::models::{Color, Subject};
use jop_common::months::{Month, MONTHS};

/// GET /api/colors
///
/// Full color list, alphabetical by name.
pub async fn list_colors(
    State(state): State<AppState>,
) -> Result<Json<Vec<Color>>, ReferenceError> {
    let rows: Vec<(String, String, Option<String>)> =
        sqlx::query_as("SELECT guid, name, hex_code FROM colors ORDER BY name")
            .fetch_all(&state.db)
            .await
            .map_err(|e| ReferenceError::DatabaseError(e.to_string()))?;

    let colors = rows
        .into_iter()
        .map(|(id, name, hex_code)| Color { id, name, hex_code })
        .collect();
    Ok(Json(colors))
}

/// GET /api/subjects
///
/// Full subject list, alphabetical by name.
pub async fn list_subjects(
    State(state): State<AppState>,
) -> Result<Json<Vec<Subject>>, ReferenceError> {
    let rows: Vec<(String, String)> =
        sqlx::query_as("SELECT guid, name FROM subjects ORDER BY name")
            .fetch_all(&state.db)
            .await
            .map_err(|e| ReferenceError::DatabaseError(e.to_string()))?;

    let subjects = rows.into_iter().map(|(id, name)| Subject { id, name }).collect();
    Ok(Json(subjects))
}

/// GET /api/months
///
/// Static calendar month table.
pub async fn list_months() -> Json<[Month; 12]> {
    Json(MONTHS)
}

/// Reference endpoint errors
#[derive(Debug)]
pub enum ReferenceError {
    DatabaseError(String),
}

impl IntoResponse for ReferenceError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ReferenceError::DatabaseError(msg) => (
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
