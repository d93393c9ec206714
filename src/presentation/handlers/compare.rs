use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use super::error_response::{error_response, verification_failure};
use crate::infrastructure::observability::sanitize_locator;
use crate::presentation::state::AppState;

const MISSING_FIELDS: &str = "Both file_url1 and file_url2 are required";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CompareRequest {
    pub file_url1: Option<String>,
    pub file_url2: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub similarity_score: f64,
    pub message: String,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub is_match: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f32>,
}

#[tracing::instrument(skip(state, payload))]
pub async fn compare_handler(
    State(state): State<AppState>,
    payload: Result<Json<CompareRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Unreadable comparison request");
            return error_response(StatusCode::BAD_REQUEST, MISSING_FIELDS);
        }
    };

    let (Some(first), Some(second)) = (
        non_empty(request.file_url1.as_deref()),
        non_empty(request.file_url2.as_deref()),
    ) else {
        tracing::warn!("Comparison request missing a locator");
        return error_response(StatusCode::BAD_REQUEST, MISSING_FIELDS);
    };

    tracing::info!(
        first = %sanitize_locator(first),
        second = %sanitize_locator(second),
        "Audio comparison requested"
    );

    match state.verification_service.compare_remote(first, second).await {
        Ok(result) => {
            let is_match = state
                .match_threshold
                .map(|threshold| result.similarity >= f64::from(threshold));

            (
                StatusCode::OK,
                Json(CompareResponse {
                    similarity_score: result.similarity,
                    message: "Audio comparison successful".to_string(),
                    is_match,
                    threshold: state.match_threshold,
                }),
            )
                .into_response()
        }
        Err(e) => verification_failure("audiocheck", e),
    }
}

pub(super) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
