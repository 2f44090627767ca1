use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::tracker::error::TrackerError;
use crate::tracker::messages;

pub mod category;
pub mod issue;
pub mod user;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// Maps tracker errors onto HTTP responses.
pub struct ApiError(TrackerError);

impl From<TrackerError> for ApiError {
    fn from(error: TrackerError) -> Self {
        ApiError(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.0;
        match &error {
            TrackerError::NotFound(_) => {
                (StatusCode::NOT_FOUND, error_body(&error)).into_response()
            }
            TrackerError::Validation(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, error_body(&error)).into_response()
            }
            TrackerError::AlreadyEnded => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "message": messages::DOWNTIME_ALREADY_ENDED,
                })),
            )
                .into_response(),
            TrackerError::Storage(e) => {
                error!("Storage error while handling request: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"status": "error", "message": "internal error"})),
                )
                    .into_response()
            }
        }
    }
}

fn error_body(error: &TrackerError) -> Json<serde_json::Value> {
    Json(json!({"status": "error", "message": error.to_string()}))
}
