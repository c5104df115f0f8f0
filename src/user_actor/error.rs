//! Error types for the User actor.

use crate::error::ErrorKind;
use crate::store::StoreError;
use crate::validation::ValidationError;
use grain_runtime::FrameworkError;
use thiserror::Error;

/// Errors that can occur during user operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    /// `Register` on an identity that is already registered.
    #[error("Identity already registered: {identity_id}")]
    AlreadyRegistered { identity_id: String },

    /// Another identity owns this email.
    #[error("Email already registered: {email}")]
    EmailTaken { email: String },

    /// The operation needs a registered user.
    #[error("User not registered: {0}")]
    NotRegistered(String),

    /// The stored state moved on since this activation read it.
    #[error("User state changed concurrently: {0}")]
    VersionConflict(String),

    #[error("User validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The store failed or returned an unreadable document.
    #[error("User store error: {0}")]
    Store(StoreError),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    Infrastructure(#[from] FrameworkError),
}

impl UserError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UserError::AlreadyRegistered { .. }
            | UserError::EmailTaken { .. }
            | UserError::VersionConflict(_) => ErrorKind::Conflict,
            UserError::NotRegistered(_) => ErrorKind::NotFound,
            UserError::Validation(_) => ErrorKind::Validation,
            UserError::Store(_) | UserError::Infrastructure(_) => ErrorKind::Infrastructure,
        }
    }
}

impl From<StoreError> for UserError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::VersionConflict { .. } => UserError::VersionConflict(err.to_string()),
            // Email is the only unique index on users.
            StoreError::UniqueViolation { value, .. } => UserError::EmailTaken { email: value },
            other => UserError::Store(other),
        }
    }
}
