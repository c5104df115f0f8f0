use crate::model::TenantProfile;
use crate::tenant_actor::{TenantActor, TenantError, TenantRequest, TenantResponse};
use grain_runtime::{ActorClient, ActorDirectory, FrameworkError};
use tracing::instrument;

/// Client for interacting with Tenant actors.
#[derive(Clone)]
pub struct TenantClient {
    directory: ActorDirectory<TenantActor>,
}

impl TenantClient {
    pub fn new(directory: ActorDirectory<TenantActor>) -> Self {
        Self { directory }
    }
}

impl ActorClient<TenantActor> for TenantClient {
    fn directory(&self) -> &ActorDirectory<TenantActor> {
        &self.directory
    }
}

impl TenantClient {
    /// Creates the tenant `system_name` on behalf of `created_by`. The caller
    /// derives `system_name` from `name`; the actor re-checks the derivation.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        system_name: &str,
        name: &str,
        description: &str,
        created_by: &str,
    ) -> Result<TenantProfile, TenantError> {
        let request = TenantRequest::Create {
            name: name.to_string(),
            description: description.to_string(),
            created_by: created_by.to_string(),
        };
        match self.call(system_name.to_string(), request).await? {
            TenantResponse::Create(profile) => Ok(profile),
            _ => Err(FrameworkError::UnexpectedResponse { expected: "Create" }.into()),
        }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, system_name: &str) -> Result<Option<TenantProfile>, TenantError> {
        match self.call(system_name.to_string(), TenantRequest::Get).await? {
            TenantResponse::Get(profile) => Ok(profile),
            _ => Err(FrameworkError::UnexpectedResponse { expected: "Get" }.into()),
        }
    }
}
