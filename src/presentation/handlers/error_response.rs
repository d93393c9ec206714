use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::services::VerificationError;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

pub fn status_for(error: &VerificationError) -> StatusCode {
    match error {
        VerificationError::InvalidReference(_) | VerificationError::InvalidIdentity(_) => {
            StatusCode::BAD_REQUEST
        }
        VerificationError::DownloadFailed { .. } if error.is_missing_object() => {
            StatusCode::NOT_FOUND
        }
        VerificationError::DownloadFailed { .. }
        | VerificationError::UploadFailed { .. }
        | VerificationError::TranscodeFailed(_) => StatusCode::BAD_GATEWAY,
        VerificationError::SpecMismatch { .. }
        | VerificationError::ModelInferenceError(_)
        | VerificationError::DegenerateEmbedding(_) => StatusCode::UNPROCESSABLE_ENTITY,
        VerificationError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        VerificationError::DimensionMismatch { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Logs the failure with its stable kind and converts it into a response.
pub fn verification_failure(operation: &'static str, error: VerificationError) -> Response {
    let status = status_for(&error);

    if status.is_server_error() {
        tracing::error!(
            operation,
            error_kind = %error.kind(),
            status = status.as_u16(),
            error = %error,
            "Request failed"
        );
    } else {
        tracing::warn!(
            operation,
            error_kind = %error.kind(),
            status = status.as_u16(),
            error = %error,
            "Request rejected"
        );
    }

    error_response(status, error.to_string())
}
