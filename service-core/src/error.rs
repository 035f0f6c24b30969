use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Machine-readable error kinds carried in the `error` field of a response.
pub mod kind {
    pub const INVALID_REQUEST: &str = "invalid_request";
    pub const INVALID_TAG: &str = "invalid_tag";
    pub const QUOTE_GENERATION_FAILED: &str = "quote_generation_failed";
    pub const DATABASE_ERROR: &str = "database_error";
    pub const INTERNAL_ERROR: &str = "internal_error";
    pub const CONFIGURATION_ERROR: &str = "configuration_error";
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request ({kind}): {message}")]
    BadRequest { kind: &'static str, message: String },

    #[error("Service unavailable ({kind}): {source}")]
    ServiceUnavailable {
        kind: &'static str,
        message: String,
        source: anyhow::Error,
    },

    #[error("Database error: {source}")]
    DatabaseError {
        message: String,
        source: anyhow::Error,
    },

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl AppError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            kind: kind::INVALID_REQUEST,
            message: message.into(),
        }
    }

    pub fn invalid_tag(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            kind: kind::INVALID_TAG,
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        AppError::DatabaseError {
            message: message.into(),
            source: source.into(),
        }
    }

    /// HTTP status this error renders with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::DatabaseError { .. }
            | AppError::InternalError(_)
            | AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::BadRequest { kind, .. } | AppError::ServiceUnavailable { kind, .. } => *kind,
            AppError::DatabaseError { .. } => kind::DATABASE_ERROR,
            AppError::InternalError(_) => kind::INTERNAL_ERROR,
            AppError::ConfigError(_) => kind::CONFIGURATION_ERROR,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();

        // Causes of server-side failures stay in the logs.
        let message = match self {
            AppError::BadRequest { message, .. } => {
                tracing::debug!(kind, %message, "Rejected request");
                message
            }
            AppError::ServiceUnavailable {
                message, source, ..
            } => {
                tracing::error!(kind, error = %source, "Upstream dependency failed");
                message
            }
            AppError::DatabaseError { message, source } => {
                tracing::error!(kind, error = %source, "Database operation failed");
                message
            }
            AppError::InternalError(err) => {
                tracing::error!(kind, error = ?err, "Internal error");
                "Internal server error".to_string()
            }
            AppError::ConfigError(err) => {
                tracing::error!(kind, error = %err, "Configuration error");
                "Configuration error".to_string()
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: kind.to_string(),
                message: Some(message),
            }),
        )
            .into_response()
    }
}
