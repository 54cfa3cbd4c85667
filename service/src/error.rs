use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Service is shutting down")]
    ShuttingDown,

    #[error("PDF generation failed: {0}")]
    Generation(#[from] folio::PipelineError),

    #[error("Content error: {0}")]
    Content(#[from] folio::SourceError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            Self::ShuttingDown => (
                StatusCode::SERVICE_UNAVAILABLE,
                "ServiceUnavailable",
                self.to_string(),
            ),
            // Renderer details stay in the log.
            Self::Generation(e) => {
                tracing::error!(stage = ?e.stage(), "PDF generation failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "GenerationFailed",
                    "PDF generation failed".to_string(),
                )
            }
            Self::Content(_) | Self::Config(_) => {
                tracing::error!("Internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalError",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
