//! Metaverse Error Types
//!
//! This module provides client-core error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::transport::TransportError;
use thiserror::Error;

/// Metaverse-specific result type alias
pub type MetaverseResult<T> = Result<T, MetaverseError>;

/// Metaverse-specific error variants
#[derive(Debug, Clone, Error)]
pub enum MetaverseError {
    /// Operation attempted without an authenticated session
    #[error("Not authenticated")]
    Unauthenticated,

    /// Empty or malformed input field
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// Remote call failed
    #[error("Remote call failed: {0}")]
    Transport(#[from] TransportError),

    /// Referenced entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Remote accepted the call but produced nothing
    #[error("Remote returned no result for {0}")]
    EmptyResult(&'static str),

    /// User abandoned the external authorization step
    #[error("Login was cancelled")]
    LoginCancelled,

    /// Session was replaced while the operation was in flight
    #[error("Session changed during {0}")]
    SessionChanged(&'static str),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MetaverseError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        MetaverseError::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, MetaverseError::Transport(_))
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            MetaverseError::Unauthenticated => ErrorKind::Unauthorized,
            MetaverseError::Validation { .. } => ErrorKind::BadRequest,
            MetaverseError::Transport(TransportError::Timeout) => ErrorKind::RequestTimeout,
            MetaverseError::Transport(_) => ErrorKind::BadGateway,
            MetaverseError::NotFound(_) => ErrorKind::NotFound,
            MetaverseError::EmptyResult(_) => ErrorKind::UnprocessableEntity,
            MetaverseError::LoginCancelled => ErrorKind::Forbidden,
            MetaverseError::SessionChanged(_) => ErrorKind::Conflict,
            MetaverseError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            MetaverseError::Unauthenticated => err.with_action("Log in and try again"),
            MetaverseError::Validation { .. } => err.with_action("Correct the highlighted field"),
            MetaverseError::EmptyResult(op) | MetaverseError::SessionChanged(op) => {
                err.with_operation(op)
            }
            MetaverseError::Transport(_) => err.with_action("Try again later"),
            _ => err,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            MetaverseError::Internal(msg) => {
                tracing::error!(message = %msg, "Metaverse internal error");
            }
            MetaverseError::Transport(e) => {
                tracing::warn!(error = %e, "Remote call failed");
            }
            MetaverseError::Unauthenticated => {
                tracing::warn!("Call without a valid delegation");
            }
            _ => {
                tracing::debug!(error = %self, "Metaverse error");
            }
        }
    }
}

impl IntoResponse for MetaverseError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
