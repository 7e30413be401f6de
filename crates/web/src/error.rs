use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use api::ApiError;
use serde_json::json;
use std::fmt;

pub const FETCH_FAILED_MESSAGE: &str = "Gagal mengambil data peserta";

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    /// Participant fetch failed; `retry` is the route that repeats the request
    Fetch { source: ApiError, retry: &'static str },
    BadRequest(String),
    InternalServerError(String),
}

impl WebError {
    pub fn fetch(source: ApiError, retry: &'static str) -> Self {
        Self::Fetch { source, retry }
    }
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch { source, .. } => write!(f, "Upstream error: {}", source),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::InternalServerError(msg) => write!(f, "Internal server error: {}", msg),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            Self::Fetch { .. } => StatusCode::BAD_GATEWAY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            Self::Fetch { source, retry } => {
                tracing::warn!("Participant fetch failed: {}", source);
                json!({
                    "error": FETCH_FAILED_MESSAGE,
                    "retry": retry
                })
            }
            Self::BadRequest(msg) => {
                json!({
                    "error": msg
                })
            }
            Self::InternalServerError(msg) => {
                tracing::error!("Internal server error: {}", msg);
                json!({
                    "error": "An internal error occurred"
                })
            }
        };

        (status_code, Json(body)).into_response()
    }
}
