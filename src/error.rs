use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Status tag carried by every API response body, success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Warning,
    Danger,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),
    #[error("Mutually exclusive: {0}")]
    MutuallyExclusive(String),
    #[error("Payment required: {0}")]
    NotPaid(String),
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    let code = db_err.code().unwrap_or_default();

                    // 2067 = SQLite Unique Constraint
                    if code == "2067" {
                        return (
                            StatusCode::CONFLICT,
                            Json(json!({
                                "status": "danger",
                                "message": "Resource already exists (duplicate entry)"
                            })),
                        )
                            .into_response();
                    }
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::CapacityExceeded(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::MutuallyExclusive(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::NotPaid(msg) => (StatusCode::PAYMENT_REQUIRED, msg.clone()),
            AppError::InvariantViolation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
        };

        let body = Json(json!({
            "status": ResponseStatus::Danger,
            "message": message
        }));

        (status, body).into_response()
    }
}
