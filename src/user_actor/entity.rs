//! [`ActorEntity`] implementation for one user.

use super::{UserError, UserRequest, UserResponse};
use crate::model::{UserProfile, UserState};
use crate::store::{EntityStore, PersistedState, USERS};
use crate::validation::{validate_registration, RegistrationInput};
use async_trait::async_trait;
use chrono::Utc;
use grain_runtime::ActorEntity;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Dependencies shared by every User activation.
#[derive(Clone)]
pub struct UserActorContext {
    pub store: Arc<dyn EntityStore>,
}

/// The activation for one identity-provider subject id.
///
/// Holds the user's state as last persisted. Every mutation builds the next
/// state, writes it with the version it was read at, and only then adopts it.
pub struct UserActor {
    identity_id: String,
    state: PersistedState<UserState>,
}

#[async_trait]
impl ActorEntity for UserActor {
    type Key = String;
    type Request = UserRequest;
    type Response = UserResponse;
    type Error = UserError;
    type Context = UserActorContext;
    const KIND: &'static str = "user";

    async fn activate(identity_id: &String, ctx: &UserActorContext) -> Result<Self, UserError> {
        let state =
            PersistedState::<UserState>::load(ctx.store.as_ref(), USERS, identity_id).await?;
        debug!(
            registered = state.get().is_registered(),
            version = ?state.version(),
            "User state loaded"
        );
        Ok(Self {
            identity_id: identity_id.clone(),
            state,
        })
    }

    async fn handle(
        &mut self,
        request: UserRequest,
        ctx: &UserActorContext,
    ) -> Result<UserResponse, UserError> {
        self.state.refresh(ctx.store.as_ref()).await?;

        match request {
            UserRequest::Register {
                email,
                first_name,
                last_name,
            } => {
                let input = RegistrationInput {
                    email,
                    first_name,
                    last_name,
                };
                self.register(input, ctx).await.map(UserResponse::Register)
            }
            UserRequest::GetProfile => Ok(UserResponse::GetProfile(self.state.get().profile())),
            UserRequest::GetTenants => {
                Ok(UserResponse::GetTenants(self.state.get().tenants.clone()))
            }
            UserRequest::GrantMembership { tenant_id, roles } => self
                .grant_membership(&tenant_id, roles, ctx)
                .await
                .map(UserResponse::GrantMembership),
        }
    }
}

impl UserActor {
    async fn register(
        &mut self,
        input: RegistrationInput,
        ctx: &UserActorContext,
    ) -> Result<UserProfile, UserError> {
        if self.state.get().is_registered() {
            return Err(UserError::AlreadyRegistered {
                identity_id: self.identity_id.clone(),
            });
        }
        let input = validate_registration(&input)?;

        let next = UserState {
            id: Some(Uuid::now_v7()),
            identity_id: self.identity_id.clone(),
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            tenants: Vec::new(),
            registered_at: Some(Utc::now()),
        };
        self.state.write(ctx.store.as_ref(), next).await?;

        let profile = self
            .state
            .get()
            .profile()
            .ok_or_else(|| UserError::NotRegistered(self.identity_id.clone()))?;
        info!(user_id = %profile.id, email = %profile.email, "User registered");
        Ok(profile)
    }

    async fn grant_membership(
        &mut self,
        tenant_id: &str,
        roles: Vec<String>,
        ctx: &UserActorContext,
    ) -> Result<bool, UserError> {
        if !self.state.get().is_registered() {
            return Err(UserError::NotRegistered(self.identity_id.clone()));
        }

        let mut next = self.state.get().clone();
        if !next.grant(tenant_id, roles) {
            debug!(tenant = tenant_id, "Membership already present");
            return Ok(false);
        }
        self.state.write(ctx.store.as_ref(), next).await?;
        info!(tenant = tenant_id, "Membership granted");
        Ok(true)
    }
}
