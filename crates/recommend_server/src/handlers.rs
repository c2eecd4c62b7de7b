//! HTTP handlers for the recommendation server

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::types::{ErrorResponse, PromptResponse};
use recommender::{build_prompt, RecommendationBody, RecommendationRequest, Recommender};

/// Shared server state
pub struct AppState {
    pub recommender: Recommender,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

/// Handler for POST /api/recommend
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RecommendationBody>,
) -> Response {
    let request_id = Uuid::new_v4();

    let request = match RecommendationRequest::try_from(body) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(%request_id, "Rejected recommendation request: {}", e);
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    match state.recommender.recommend(&request).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            // Upstream details stay in the log; callers get a generic failure
            tracing::error!(%request_id, "Recommendation failed: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to get recommendations",
            )
        }
    }
}

/// Handler for POST /api/prompt
///
/// Renders the prompt without calling the model.
pub async fn preview_prompt(Json(body): Json<RecommendationBody>) -> Response {
    let request = match RecommendationRequest::try_from(body) {
        Ok(r) => r,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    let prompt = build_prompt(
        &request.rated_tracks,
        &request.unrated_tracks,
        request.training_mode,
    );

    (
        StatusCode::OK,
        Json(PromptResponse {
            mode: request.training_mode,
            prompt,
        }),
    )
        .into_response()
}

/// Handler for GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
