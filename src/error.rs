// Error types: fetch outcomes from the catalogue backend, and HTTP-facing errors

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

// Message shown to the host view for any failed fetch; details only go to the logs
pub const FETCH_FAILED_MESSAGE: &str = "We couldn't load products right now. Please try again.";

/// Why a product fetch failed. Both kinds collapse into one user-visible error state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    /// Transport failure, timeout, or a non-2xx status.
    #[error("network error: {0}")]
    Network(String),
    /// A 2xx body that is not `{success: true, products: [...]}`.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl FetchError {
    pub fn user_message(&self) -> &'static str {
        FETCH_FAILED_MESSAGE
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            FetchError::Protocol(error.to_string())
        } else {
            FetchError::Network(error.to_string())
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    // The catalogue backend failed a request we proxy directly
    Upstream(FetchError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound(message) => {
                tracing::debug!("Not found: {}", message);
                (StatusCode::NOT_FOUND, message)
            }
            AppError::Upstream(e) => {
                tracing::warn!("Catalogue backend error: {}", e);
                (StatusCode::BAD_GATEWAY, e.user_message().to_string())
            }
        };

        let body = Json(json!({ "success": false, "error": error_message }));
        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
