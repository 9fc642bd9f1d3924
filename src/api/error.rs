//! API error type and its JSON rendering.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use super::types::{ClientErrorBody, ServerErrorBody};
use crate::grid::SimulationError;

/// Detail sent to clients for 500 responses; the real cause is only logged.
pub const INTERNAL_DETAIL: &str = "simulation failed; see server logs";

/// Errors returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Client error: invalid or unparsable input.
    #[error("{0}")]
    BadRequest(String),

    /// Unexpected server-side failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            Self::BadRequest(message) => {
                tracing::debug!(error = %message, "rejected simulation request");
                let body = ClientErrorBody {
                    error: message,
                    status_code: status.as_u16(),
                };
                (status, Json(body)).into_response()
            }
            Self::Internal(detail) => {
                tracing::error!(error = %detail, "unexpected simulation failure");
                let body = ServerErrorBody {
                    error: "Internal server error".to_string(),
                    detail: INTERNAL_DETAIL.to_string(),
                };
                (status, Json(body)).into_response()
            }
        }
    }
}

impl From<SimulationError> for ApiError {
    fn from(err: SimulationError) -> Self {
        match err {
            SimulationError::InvalidInput(msg) => Self::BadRequest(msg),
            SimulationError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(format!("invalid request body: {}", rejection.body_text()))
    }
}
