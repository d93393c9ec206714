use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use super::compare::non_empty;
use super::error_response::{error_response, verification_failure};
use crate::infrastructure::observability::sanitize_locator;
use crate::presentation::state::AppState;

const MISSING_FIELDS: &str = "Both file_url and username are required";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PublishRequest {
    pub file_url: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub processed_file_url: String,
    pub message: String,
}

#[tracing::instrument(skip(state, payload))]
pub async fn publish_handler(
    State(state): State<AppState>,
    payload: Result<Json<PublishRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Unreadable publish request");
            return error_response(StatusCode::BAD_REQUEST, MISSING_FIELDS);
        }
    };

    let (Some(locator), Some(username)) = (
        non_empty(request.file_url.as_deref()),
        non_empty(request.username.as_deref()),
    ) else {
        tracing::warn!("Publish request missing locator or username");
        return error_response(StatusCode::BAD_REQUEST, MISSING_FIELDS);
    };

    tracing::info!(
        locator = %sanitize_locator(locator),
        username = %username,
        "Audio normalization requested"
    );

    match state
        .verification_service
        .publish_normalized(locator, username)
        .await
    {
        Ok(url) => (
            StatusCode::OK,
            Json(PublishResponse {
                processed_file_url: url.into_string(),
                message: "Audio processed successfully with exact specifications".to_string(),
            }),
        )
            .into_response(),
        Err(e) => verification_failure("process_audio", e),
    }
}
