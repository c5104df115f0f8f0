use crate::claims::ClaimsEnricher;
use crate::clients::{TenantClient, UserClient};
use crate::config::Config;
use crate::store::EntityStore;
use crate::tenancy::{ActorTenantDirectory, TenantResolver};
use crate::tenant_actor::{self, TenantActor};
use crate::user_actor::{self, UserActor};
use crate::workflow::{GrantPolicy, TenantProvisioning, UserRegistration};
use grain_runtime::{ActorDirectory, FrameworkError};
use std::sync::Arc;
use tracing::{error, info};

/// The running tenancy core.
///
/// Owns the User and Tenant directories and everything built on their
/// clients. Cloning is cheap; every clone drives the same activations.
///
/// # Example
///
/// ```ignore
/// let store = Arc::new(MemoryStore::new().with_unique_index(USERS, "email"));
/// let system = TenancySystem::start(store, &Config::from_env()?);
///
/// system.registration.register("auth0|1", input).await?;
/// system.shutdown().await?;
/// ```
#[derive(Clone)]
pub struct TenancySystem {
    pub users: UserClient,
    pub tenants: TenantClient,
    pub enricher: ClaimsEnricher,
    pub resolver: TenantResolver,
    pub registration: UserRegistration,
    pub provisioning: TenantProvisioning,

    user_directory: ActorDirectory<UserActor>,
    tenant_directory: ActorDirectory<TenantActor>,
}

impl TenancySystem {
    /// Wires directories, clients and workflows over `store`.
    ///
    /// Nothing is activated here; activations start on first call.
    pub fn start(store: Arc<dyn EntityStore>, config: &Config) -> Self {
        let directory_config = config.actors.directory();
        let (user_directory, users) = user_actor::new(store.clone(), directory_config.clone());
        let (tenant_directory, tenants) = tenant_actor::new(store.clone(), directory_config);

        let enricher = ClaimsEnricher::new(users.clone(), config.tenancy.enrichment_timeout);
        let resolver = TenantResolver::new(
            config.tenancy.header.clone(),
            Arc::new(ActorTenantDirectory::new(tenants.clone())),
        );
        let registration = UserRegistration::new(store, users.clone());
        let provisioning = TenantProvisioning::new(
            users.clone(),
            tenants.clone(),
            GrantPolicy {
                owner_role: config.tenancy.owner_role.clone(),
                attempts: config.tenancy.grant_attempts,
                backoff: config.tenancy.grant_backoff,
            },
        );

        info!(tenant_header = %config.tenancy.header, "Tenancy system started");
        Self {
            users,
            tenants,
            enricher,
            resolver,
            registration,
            provisioning,
            user_directory,
            tenant_directory,
        }
    }

    /// Number of live User and Tenant activations.
    pub fn active_count(&self) -> usize {
        self.user_directory.active_count() + self.tenant_directory.active_count()
    }

    /// Stops both directories and waits for every activation to finish.
    ///
    /// Calls made afterwards fail with [`FrameworkError::DirectoryClosed`].
    pub async fn shutdown(&self) -> Result<(), FrameworkError> {
        info!("Shutting down tenancy system...");
        let (users, tenants) = tokio::join!(
            self.user_directory.shutdown(),
            self.tenant_directory.shutdown()
        );
        if let Err(e) = &users {
            error!(error = %e, "User directory shut down with errors");
        }
        if let Err(e) = &tenants {
            error!(error = %e, "Tenant directory shut down with errors");
        }
        users.and(tenants)?;
        info!("Tenancy system shut down");
        Ok(())
    }
}
