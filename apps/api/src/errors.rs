use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::export::ExportError;
use crate::services::credits::CreditError;
use crate::services::drafts::DraftError;
use crate::services::optimizer::OptimizerError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Optimizer(#[from] OptimizerError),

    #[error(transparent)]
    Credits(#[from] CreditError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),

            AppError::Optimizer(err) => optimizer_response(err),

            AppError::Credits(CreditError::Insufficient { remaining }) => (
                StatusCode::PAYMENT_REQUIRED,
                "NO_CREDITS",
                format!("No optimization credits remaining ({remaining} left)"),
            ),
            AppError::Credits(err) => {
                tracing::error!("Credit service error: {err}");
                (
                    StatusCode::BAD_GATEWAY,
                    "CREDITS_UNAVAILABLE",
                    "The billing service is currently unavailable".to_string(),
                )
            }

            AppError::Export(ExportError::Validation(err)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
            }
            AppError::Export(ExportError::Backend(detail)) => {
                tracing::error!("Export adapter failure: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXPORT_FAILED",
                    "Export failed, please try again".to_string(),
                )
            }

            AppError::Draft(err) => {
                tracing::error!("Draft store error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DRAFT_STORE_ERROR",
                    "Could not read or write the draft".to_string(),
                )
            }

            AppError::Internal(err) => {
                tracing::error!("Internal error: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// Maps a classified optimizer error to an HTTP condition: retryable
/// (rate limit, upstream trouble) or terminal (bad input, auth).
fn optimizer_response(err: &OptimizerError) -> (StatusCode, &'static str, String) {
    match err {
        OptimizerError::BadInput(msg) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "OPTIMIZER_REJECTED_INPUT",
            msg.clone(),
        ),
        OptimizerError::Auth => {
            tracing::error!("Optimizer auth failure");
            (
                StatusCode::BAD_GATEWAY,
                "OPTIMIZER_AUTH",
                "The optimizer service rejected our credentials".to_string(),
            )
        }
        OptimizerError::RateLimited { .. } => (
            StatusCode::TOO_MANY_REQUESTS,
            "OPTIMIZER_RATE_LIMITED",
            "The optimizer is busy, please retry shortly".to_string(),
        ),
        OptimizerError::Server { status, message } => {
            tracing::error!("Optimizer server error {status}: {message}");
            (
                StatusCode::BAD_GATEWAY,
                "OPTIMIZER_UNAVAILABLE",
                "The optimizer service is currently unavailable".to_string(),
            )
        }
        OptimizerError::Transport(err) => {
            tracing::error!("Optimizer transport error: {err}");
            (
                StatusCode::BAD_GATEWAY,
                "OPTIMIZER_UNAVAILABLE",
                "The optimizer service is currently unavailable".to_string(),
            )
        }
        OptimizerError::MalformedResponse(err) => {
            tracing::error!("Optimizer returned malformed payload: {err}");
            (
                StatusCode::BAD_GATEWAY,
                "OPTIMIZER_MALFORMED",
                "The optimizer returned an unusable response".to_string(),
            )
        }
    }
}
