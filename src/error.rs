use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
///
/// Every variant renders as `{"error": <code>}` where `code` is a stable,
/// machine-readable identifier the dashboard can branch on.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("user_id is missing or empty")]
    MissingUserId,

    #[error("unrecognized risk tolerance: {0}")]
    InvalidRiskTolerance(String),

    #[error("invalid top_k: {0}")]
    InvalidTopK(String),

    /// Body or query string that could not be read at all
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),
}

impl AppError {
    /// Stable error code used in the JSON body
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingUserId => "missing_user_id",
            AppError::InvalidRiskTolerance(_) => "invalid_risk_tolerance",
            AppError::InvalidTopK(_) => "invalid_top_k",
            AppError::MalformedRequest(_) => "invalid_request",
            AppError::ModelUnavailable(_) => "model_unavailable",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingUserId
            | AppError::InvalidRiskTolerance(_)
            | AppError::InvalidTopK(_)
            | AppError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Rejected request");
        }

        let body = Json(json!({
            "error": self.code()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
