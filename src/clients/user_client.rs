use crate::model::{TenantMembership, UserProfile};
use crate::user_actor::{UserActor, UserError, UserRequest, UserResponse};
use crate::validation::RegistrationInput;
use grain_runtime::{ActorClient, ActorDirectory, FrameworkError};
use tracing::instrument;

/// Client for interacting with User actors.
#[derive(Clone)]
pub struct UserClient {
    directory: ActorDirectory<UserActor>,
}

impl UserClient {
    pub fn new(directory: ActorDirectory<UserActor>) -> Self {
        Self { directory }
    }
}

impl ActorClient<UserActor> for UserClient {
    fn directory(&self) -> &ActorDirectory<UserActor> {
        &self.directory
    }
}

fn unexpected(expected: &'static str) -> UserError {
    FrameworkError::UnexpectedResponse { expected }.into()
}

impl UserClient {
    #[instrument(skip(self, input))]
    pub async fn register(
        &self,
        identity_id: &str,
        input: RegistrationInput,
    ) -> Result<UserProfile, UserError> {
        let request = UserRequest::Register {
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
        };
        match self.call(identity_id.to_string(), request).await? {
            UserResponse::Register(profile) => Ok(profile),
            _ => Err(unexpected("Register")),
        }
    }

    #[instrument(skip(self))]
    pub async fn get_profile(&self, identity_id: &str) -> Result<Option<UserProfile>, UserError> {
        match self.call(identity_id.to_string(), UserRequest::GetProfile).await? {
            UserResponse::GetProfile(profile) => Ok(profile),
            _ => Err(unexpected("GetProfile")),
        }
    }

    #[instrument(skip(self))]
    pub async fn get_tenants(&self, identity_id: &str) -> Result<Vec<TenantMembership>, UserError> {
        match self.call(identity_id.to_string(), UserRequest::GetTenants).await? {
            UserResponse::GetTenants(tenants) => Ok(tenants),
            _ => Err(unexpected("GetTenants")),
        }
    }

    #[instrument(skip(self))]
    pub async fn grant_membership(
        &self,
        identity_id: &str,
        tenant_id: &str,
        roles: Vec<String>,
    ) -> Result<bool, UserError> {
        let request = UserRequest::GrantMembership {
            tenant_id: tenant_id.to_string(),
            roles,
        };
        match self.call(identity_id.to_string(), request).await? {
            UserResponse::GrantMembership(changed) => Ok(changed),
            _ => Err(unexpected("GrantMembership")),
        }
    }
}
