//! JSON endpoint running the concert pipeline.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use encore_core::{ConcertCalendar, PipelineError, PipelineRequest};

use crate::state::AppState;

/// Request body for `POST /api/v1/concerts`.
#[derive(Debug, Deserialize)]
pub struct ConcertsRequest {
    /// Authorization code from the Spotify redirect.
    pub code: String,
    /// Number of top artists (default from `pipeline.default_artist_limit`).
    #[serde(default)]
    pub artist_count: Option<u32>,
    /// Two-letter state or province code.
    pub region: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

/// HTTP status for a failed pipeline run.
pub fn pipeline_error_status(error: &PipelineError) -> StatusCode {
    match error {
        PipelineError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        PipelineError::TokenExchange(_) | PipelineError::TopArtists(_) => StatusCode::BAD_GATEWAY,
    }
}

pub async fn find_concerts(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConcertsRequest>,
) -> Result<Json<ConcertCalendar>, (StatusCode, Json<ErrorResponse>)> {
    let artist_limit = request
        .artist_count
        .unwrap_or(state.pipeline().config().default_artist_limit);

    info!(
        "API concert search: {} artist(s) in {}",
        artist_limit, request.region
    );

    let calendar = state
        .pipeline()
        .run(PipelineRequest {
            authorization_code: request.code,
            artist_limit,
            region: request.region,
        })
        .await
        .map_err(|e| {
            (
                pipeline_error_status(&e),
                Json(ErrorResponse {
                    error: e.to_string(),
                    kind: e.kind().to_string(),
                }),
            )
        })?;

    Ok(Json(calendar))
}
