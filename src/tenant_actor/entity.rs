//! [`ActorEntity`] implementation for one tenant.

use super::{TenantError, TenantRequest, TenantResponse};
use crate::model::{TenantProfile, TenantState};
use crate::store::{EntityStore, PersistedState, StoreError, TENANTS};
use crate::validation::{validate_tenant, TenantInput, ValidationError};
use async_trait::async_trait;
use chrono::Utc;
use grain_runtime::ActorEntity;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Dependencies shared by every Tenant activation.
#[derive(Clone)]
pub struct TenantActorContext {
    pub store: Arc<dyn EntityStore>,
}

/// The activation for one tenant system name.
pub struct TenantActor {
    system_name: String,
    state: PersistedState<TenantState>,
}

#[async_trait]
impl ActorEntity for TenantActor {
    type Key = String;
    type Request = TenantRequest;
    type Response = TenantResponse;
    type Error = TenantError;
    type Context = TenantActorContext;
    const KIND: &'static str = "tenant";

    async fn activate(system_name: &String, ctx: &TenantActorContext) -> Result<Self, TenantError> {
        let state =
            PersistedState::<TenantState>::load(ctx.store.as_ref(), TENANTS, system_name).await?;
        debug!(
            exists = state.get().exists(),
            version = ?state.version(),
            "Tenant state loaded"
        );
        Ok(Self {
            system_name: system_name.clone(),
            state,
        })
    }

    async fn handle(
        &mut self,
        request: TenantRequest,
        ctx: &TenantActorContext,
    ) -> Result<TenantResponse, TenantError> {
        self.state.refresh(ctx.store.as_ref()).await?;

        match request {
            TenantRequest::Create {
                name,
                description,
                created_by,
            } => self
                .create(TenantInput { name, description }, created_by, ctx)
                .await
                .map(TenantResponse::Create),
            TenantRequest::Get => Ok(TenantResponse::Get(self.state.get().profile())),
        }
    }
}

impl TenantActor {
    async fn create(
        &mut self,
        input: TenantInput,
        created_by: String,
        ctx: &TenantActorContext,
    ) -> Result<TenantProfile, TenantError> {
        if self.system_name.is_empty() {
            return Err(ValidationError::new("name", "system name is empty").into());
        }
        let existing = self.state.get();
        if existing.exists() {
            return Err(TenantError::AlreadyExists {
                system_name: existing.system_name.clone(),
                name: existing.name.clone(),
                created_by: existing.created_by.clone(),
            });
        }

        let (derived, input) = validate_tenant(&input)?;
        if derived != self.system_name {
            return Err(ValidationError::new(
                "name",
                format!("derives to '{}', not '{}'", derived, self.system_name),
            )
            .into());
        }

        let next = TenantState {
            system_name: self.system_name.clone(),
            name: input.name,
            description: input.description,
            storage_prefix: Some(Uuid::now_v7()),
            created_at: Some(Utc::now()),
            created_by,
        };
        self.state.write(ctx.store.as_ref(), next).await?;

        let profile = self.state.get().profile().ok_or_else(|| {
            TenantError::Store(StoreError::Serialization("created tenant has no profile".into()))
        })?;
        info!(
            name = %profile.name,
            storage_prefix = %profile.storage_prefix,
            created_by = %self.state.get().created_by,
            "Tenant created"
        );
        Ok(profile)
    }
}
