use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Handler errors. Causes are logged where they happen; clients only see a
/// fixed message, so store and upstream failures are indistinguishable.
#[derive(Debug)]
pub enum AppError {
    /// `400` with a plain-text body.
    BadRequest(String),
    /// `500` with a `{"error": ...}` body.
    Internal(String),
    /// `500` with a plain-text body.
    InternalText(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": msg }))).into_response()
            }
            AppError::InternalText(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response()
            }
        }
    }
}
