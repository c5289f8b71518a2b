//! Gateway error taxonomy and HTTP mapping.
//!
//! Business-rule outcomes (`p_result_code = "EMAIL_DUPLICATE"` and friends) are *not*
//! errors here; they pass through inside a 200 envelope. This module only covers
//! transport, binding and connectivity failures, each mapped deliberately to a status:
//!
//! - [`Error::Connectivity`]: pool creation or checkout failed, 500
//! - [`Error::Validation`]: malformed JSON, type mismatch, width violation, 400
//! - [`Error::Execution`]: the CALL or query raised, 500
//! - [`Error::Timeout`]: execution exceeded the configured bound, 504
//!
//! The `detail` field carries the underlying driver error chain and is stripped by
//! [`Error::redacted`] before leaving the gateway in production configurations.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::time::Duration;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Connecting to the database or checking out a pooled connection failed
    #[error("database connection failed")]
    Connectivity { detail: Option<String> },

    /// The request body could not be bound to the endpoint's declared shape
    #[error("{message}")]
    Validation { message: String },

    /// The stored procedure call or SQL statement raised
    #[error("failed to {operation}")]
    Execution { operation: String, detail: Option<String> },

    /// Execution did not complete within the configured statement timeout
    #[error("{operation} timed out after {timeout:?}")]
    Timeout { operation: String, timeout: Duration },
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Connectivity { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::Execution { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Strip the driver error chain so it is never emitted in production
    pub fn redacted(self) -> Self {
        match self {
            Error::Connectivity { .. } => Error::Connectivity { detail: None },
            Error::Execution { operation, .. } => Error::Execution { operation, detail: None },
            other => other,
        }
    }

    fn detail(&self) -> Option<&str> {
        match self {
            Error::Connectivity { detail } => detail.as_deref(),
            Error::Execution { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::Connectivity { .. } | Error::Execution { .. } => {
                tracing::error!("Gateway error: {:#}", self);
            }
            Error::Timeout { .. } => {
                tracing::warn!("Timeout: {}", self);
            }
            Error::Validation { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        let body = match self.detail() {
            Some(detail) => json!({ "error": self.to_string(), "detail": detail }),
            None => json!({ "error": self.to_string() }),
        };

        (status, axum::response::Json(body)).into_response()
    }
}

/// Malformed or ill-typed JSON bodies surface as 400, not 500
impl From<axum::extract::rejection::JsonRejection> for Error {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        Error::Validation {
            message: rejection.body_text(),
        }
    }
}

/// Type alias for gateway operation results
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let connectivity = Error::Connectivity { detail: None };
        assert_eq!(connectivity.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let validation = Error::Validation {
            message: "phone_number is required".into(),
        };
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);

        let execution = Error::Execution {
            operation: "call PRC_COF_PHONE_REQUEST".into(),
            detail: Some("1305: PROCEDURE does not exist".into()),
        };
        assert_eq!(execution.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let timeout = Error::Timeout {
            operation: "call PRC_COF_USER_SIGNUP".into(),
            timeout: Duration::from_secs(10),
        };
        assert_eq!(timeout.status_code(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_redaction_strips_detail() {
        let err = Error::Execution {
            operation: "call PRC_COF_PHONE_REQUEST".into(),
            detail: Some("table 'verifications' doesn't exist".into()),
        };
        let redacted = err.redacted();
        assert!(redacted.detail().is_none());
        // Message survives redaction
        assert_eq!(redacted.to_string(), "failed to call PRC_COF_PHONE_REQUEST");
    }

    #[test]
    fn test_validation_passes_through_redaction() {
        let err = Error::Validation {
            message: "verification_code must be exactly 6 characters".into(),
        };
        let redacted = err.redacted();
        assert_eq!(redacted.to_string(), "verification_code must be exactly 6 characters");
    }
}
