//! Error types for the Annotator Store

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::auth::CallerIdentity;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
///
/// Every variant renders as a bare JSON string body alongside its status.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Storage-specific errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid annotation document: {0}")]
    Document(#[from] serde_json::Error),

    #[error("Annotation has no id")]
    MissingId,
}

impl AppError {
    /// Build the 401 returned when a caller may not perform an action.
    ///
    /// `context` names the attempted action and may be empty.
    pub fn unauthorized(context: &str, caller: &CallerIdentity) -> Self {
        let context = if context.is_empty() {
            String::new()
        } else {
            format!(" ({})", context)
        };
        let (user, consumer) = match caller.user() {
            Some(identity) => (identity.id.as_str(), identity.consumer.key.as_str()),
            None => ("None", "None"),
        };

        AppError::Unauthorized(format!(
            "Cannot authorize request{}. Perhaps you're not logged in as a user with \
             appropriate permissions on this annotation? (user={}, consumer={})",
            context, user, consumer
        ))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => {
                tracing::debug!("Authorization failed: {}", msg);
                (StatusCode::UNAUTHORIZED, msg)
            }
            AppError::Store(e) => {
                tracing::error!("Store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Json(message)).into_response()
    }
}
