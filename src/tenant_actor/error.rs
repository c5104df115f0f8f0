//! Error types for the Tenant actor.

use crate::error::ErrorKind;
use crate::store::StoreError;
use crate::validation::ValidationError;
use grain_runtime::FrameworkError;
use thiserror::Error;

/// Errors that can occur during tenant operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TenantError {
    /// `Create` on a tenant that already exists. Carries the existing display
    /// name and creator.
    #[error("Tenant already exists: {system_name} ({name})")]
    AlreadyExists {
        system_name: String,
        name: String,
        created_by: String,
    },

    #[error("Tenant validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The stored state moved on since this activation read it.
    #[error("Tenant state changed concurrently: {0}")]
    VersionConflict(String),

    #[error("Tenant store error: {0}")]
    Store(StoreError),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    Infrastructure(#[from] FrameworkError),
}

impl TenantError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TenantError::AlreadyExists { .. } | TenantError::VersionConflict(_) => {
                ErrorKind::Conflict
            }
            TenantError::Validation(_) => ErrorKind::Validation,
            TenantError::Store(_) | TenantError::Infrastructure(_) => ErrorKind::Infrastructure,
        }
    }
}

impl From<StoreError> for TenantError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::VersionConflict { .. } => TenantError::VersionConflict(err.to_string()),
            other => TenantError::Store(other),
        }
    }
}
