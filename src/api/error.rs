//! HTTP error responses.

use super::auth::AuthError;
use crate::claims::EnrichmentError;
use crate::error::ErrorKind;
use crate::tenancy::{TenantAccessDenied, TenantDirectoryError};
use crate::tenant_actor::TenantError;
use crate::workflow::{ProvisioningError, RegistrationError};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

/// Error body: `{"error": "<kind>", "message": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// A failure on its way to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(ErrorKind::Unauthorized, "Authentication required")
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status(&self) -> StatusCode {
        match self.kind {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Infrastructure => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Infrastructure detail stays in the logs.
    fn from_kind(kind: ErrorKind, err: &dyn std::error::Error) -> Self {
        if kind == ErrorKind::Infrastructure {
            error!(error = %err, "Request failed");
            Self::new(kind, "Service temporarily unavailable")
        } else {
            Self::new(kind, err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.kind.to_string(),
            message: self.message,
        };
        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::new(ErrorKind::Unauthorized, err.to_string())
    }
}

/// Malformed or mistyped request bodies are validation failures.
impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        Self::new(ErrorKind::Validation, err.body_text())
    }
}

impl From<TenantAccessDenied> for ApiError {
    fn from(err: TenantAccessDenied) -> Self {
        Self::new(ErrorKind::Forbidden, err.to_string())
    }
}

impl From<EnrichmentError> for ApiError {
    fn from(err: EnrichmentError) -> Self {
        Self::from_kind(err.kind(), &err)
    }
}

impl From<TenantDirectoryError> for ApiError {
    fn from(err: TenantDirectoryError) -> Self {
        Self::from_kind(err.kind(), &err)
    }
}

impl From<TenantError> for ApiError {
    fn from(err: TenantError) -> Self {
        Self::from_kind(err.kind(), &err)
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        Self::from_kind(err.kind(), &err)
    }
}

impl From<ProvisioningError> for ApiError {
    fn from(err: ProvisioningError) -> Self {
        match err {
            ProvisioningError::RegistrationRequired(_) => {
                Self::new(ErrorKind::NotFound, "registration required")
            }
            other => Self::from_kind(other.kind(), &other),
        }
    }
}
