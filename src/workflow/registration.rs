//! User registration.

use crate::clients::UserClient;
use crate::error::ErrorKind;
use crate::model::UserProfile;
use crate::store::{EntityStore, StoreError, USERS};
use crate::user_actor::UserError;
use crate::validation::{validate_registration, RegistrationInput, ValidationError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RegistrationError {
    #[error("Invalid registration: {0}")]
    Validation(#[from] ValidationError),

    /// Another identity registered this email first.
    #[error("Email already registered: {email}")]
    EmailTaken { email: String },

    #[error(transparent)]
    User(#[from] UserError),

    #[error("Email lookup failed: {0}")]
    Store(#[from] StoreError),
}

impl RegistrationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistrationError::Validation(_) => ErrorKind::Validation,
            RegistrationError::EmailTaken { .. } => ErrorKind::Conflict,
            RegistrationError::User(err) => err.kind(),
            RegistrationError::Store(_) => ErrorKind::Infrastructure,
        }
    }
}

/// Registers identities with their User actor.
///
/// Input is validated and the email checked for uniqueness before the actor is
/// called. The store's unique index still guards the write itself, so two
/// identities racing for one email cannot both win.
#[derive(Clone)]
pub struct UserRegistration {
    store: Arc<dyn EntityStore>,
    users: UserClient,
}

impl UserRegistration {
    pub fn new(store: Arc<dyn EntityStore>, users: UserClient) -> Self {
        Self { store, users }
    }

    #[instrument(skip(self, input))]
    pub async fn register(
        &self,
        identity_id: &str,
        input: RegistrationInput,
    ) -> Result<UserProfile, RegistrationError> {
        let input = validate_registration(&input)?;

        if let Some(owner) = self.store.find_by_unique(USERS, "email", &input.email).await? {
            if owner.id != identity_id {
                warn!(email = %input.email, "Email owned by another identity");
                return Err(RegistrationError::EmailTaken { email: input.email });
            }
        }

        let profile = self.users.register(identity_id, input).await?;
        info!(user_id = %profile.id, "User registered");
        Ok(profile)
    }

    /// The caller's profile, or `None` before registration.
    pub async fn profile(
        &self,
        identity_id: &str,
    ) -> Result<Option<UserProfile>, RegistrationError> {
        Ok(self.users.get_profile(identity_id).await?)
    }
}
