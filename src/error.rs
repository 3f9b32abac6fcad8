//! Error types for the intake API.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Token issuance/verification errors.
///
/// Each variant is a distinct rejection reason; they all surface to the
/// client as 401, except signing failures which are 500.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Missing or invalid authorization header")]
    MissingHeader,

    #[error("Token verification failed")]
    Verification(#[source] jsonwebtoken::errors::Error),

    #[error("Token binding mismatch")]
    BindingMismatch,

    #[error("Invalid token type")]
    WrongType,

    #[error("Token signing failed")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Errors talking to the external Intake Gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Intake Gateway not configured")]
    NotConfigured,

    #[error("Rate limited by the Intake Gateway")]
    RateLimited,

    #[error("Intake Gateway returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Intake Gateway request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors from the transactional email provider.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Email provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Email provider returned {status}: {message}")]
    Provider { status: u16, message: String },
}

/// API-facing error with an HTTP mapping.
///
/// The taxonomy is shallow and status-driven: 400 invalid input, 401 token
/// failures, 429 downstream rate limiting (distinct `rate_limited` code so
/// the client can show a specific message), 5xx downstream/config failure.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("rate_limited")]
    RateLimited,

    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(e) => {
                tracing::error!(error = %e, "token signing failed");
                Self::Internal("Failed to generate token".to_string())
            }
            other => Self::Unauthorized(other.to_string()),
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotConfigured => {
                Self::Internal("Intake Gateway not configured".to_string())
            }
            GatewayError::RateLimited => Self::RateLimited,
            GatewayError::Upstream { status, message } => Self::Upstream { status, message },
            GatewayError::Http(e) => {
                tracing::error!(error = %e, "gateway request failed");
                Self::Upstream {
                    status: 502,
                    message: "Intake Gateway unreachable".to_string(),
                }
            }
        }
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
