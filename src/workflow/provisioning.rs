//! Tenant provisioning.
//!
//! Creating a tenant touches two actors with no transaction between them: the
//! Tenant actor creates the tenant, then the creator's User actor records the
//! owner membership. The second step is idempotent, so it is retried until it
//! lands. If every attempt failed, the creator retrying the create drives it
//! again: the Tenant actor remembers who created it, and an `AlreadyExists`
//! for the same creator re-grants the owner role before reporting the conflict.

use crate::clients::{TenantClient, UserClient};
use crate::error::ErrorKind;
use crate::model::TenantProfile;
use crate::tenant_actor::TenantError;
use crate::user_actor::UserError;
use crate::validation::{validate_tenant, TenantInput, ValidationError};
use futures::future::try_join_all;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProvisioningError {
    #[error("Invalid tenant: {0}")]
    Validation(#[from] ValidationError),

    /// The caller has no User record yet.
    #[error("Registration required for {0}")]
    RegistrationRequired(String),

    #[error(transparent)]
    Tenant(#[from] TenantError),

    #[error(transparent)]
    User(#[from] UserError),

    /// The tenant exists but the owner membership could not be recorded.
    #[error("Tenant {tenant} created, owner membership for {identity_id} pending: {source}")]
    MembershipPending {
        tenant: String,
        identity_id: String,
        attempts: u32,
        #[source]
        source: UserError,
    },
}

impl ProvisioningError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProvisioningError::Validation(_) => ErrorKind::Validation,
            ProvisioningError::RegistrationRequired(_) => ErrorKind::NotFound,
            ProvisioningError::Tenant(err) => err.kind(),
            ProvisioningError::User(err) => err.kind(),
            ProvisioningError::MembershipPending { .. } => ErrorKind::Infrastructure,
        }
    }
}

/// Retry policy for the membership grant.
#[derive(Debug, Clone)]
pub struct GrantPolicy {
    /// Role given to a tenant's creator
    pub owner_role: String,
    /// Total attempts, including the first
    pub attempts: u32,
    /// Delay before the second attempt; doubles after each failure
    pub backoff: Duration,
}

#[derive(Clone)]
pub struct TenantProvisioning {
    users: UserClient,
    tenants: TenantClient,
    policy: GrantPolicy,
}

impl TenantProvisioning {
    pub fn new(users: UserClient, tenants: TenantClient, policy: GrantPolicy) -> Self {
        Self { users, tenants, policy }
    }

    /// Creates a tenant owned by `creator`.
    ///
    /// When the tenant already exists and `creator` created it, the owner
    /// membership is granted again before the conflict is returned.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(
        &self,
        creator: &str,
        input: TenantInput,
    ) -> Result<TenantProfile, ProvisioningError> {
        let (system_name, input) = validate_tenant(&input)?;

        if self.users.get_profile(creator).await?.is_none() {
            return Err(ProvisioningError::RegistrationRequired(creator.to_string()));
        }

        let created = self
            .tenants
            .create(&system_name, &input.name, &input.description, creator)
            .await;
        let tenant = match created {
            Ok(tenant) => tenant,
            Err(TenantError::AlreadyExists {
                system_name,
                name,
                created_by,
            }) => {
                if created_by == creator {
                    info!(tenant = %system_name, "Tenant exists, re-granting its creator");
                    self.ensure_membership(creator, &system_name).await?;
                }
                return Err(TenantError::AlreadyExists {
                    system_name,
                    name,
                    created_by,
                }
                .into());
            }
            Err(err) => return Err(err.into()),
        };
        info!(tenant = %tenant.system_name, "Tenant created, granting owner");

        self.ensure_membership(creator, &tenant.system_name).await?;
        Ok(tenant)
    }

    /// Grants `identity_id` the owner role in `tenant_id`, retrying transient
    /// failures with exponential backoff.
    ///
    /// Returns whether the membership changed. Safe to call any number of times.
    #[instrument(skip(self))]
    pub async fn ensure_membership(
        &self,
        identity_id: &str,
        tenant_id: &str,
    ) -> Result<bool, ProvisioningError> {
        let roles = vec![self.policy.owner_role.clone()];
        let attempts = self.policy.attempts.max(1);
        let mut delay = self.policy.backoff;
        let mut attempt = 1;

        loop {
            match self.users.grant_membership(identity_id, tenant_id, roles.clone()).await {
                Ok(changed) => {
                    debug!(attempt, changed, "Membership granted");
                    return Ok(changed);
                }
                Err(err) if is_retryable(&err) && attempt < attempts => {
                    warn!(attempt, error = %err, ?delay, "Membership grant failed, retrying");
                    tokio::time::sleep(delay).await;
                    delay = delay.saturating_mul(2);
                    attempt += 1;
                }
                Err(err) if is_retryable(&err) => {
                    error!(attempts, error = %err, "Membership grant exhausted retries");
                    return Err(ProvisioningError::MembershipPending {
                        tenant: tenant_id.to_string(),
                        identity_id: identity_id.to_string(),
                        attempts,
                        source: err,
                    });
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Profiles of every tenant `identity_id` belongs to.
    ///
    /// Tenants are read concurrently. A membership whose tenant no longer
    /// exists is skipped.
    #[instrument(skip(self))]
    pub async fn accessible_tenants(
        &self,
        identity_id: &str,
    ) -> Result<Vec<TenantProfile>, ProvisioningError> {
        let memberships = self.users.get_tenants(identity_id).await?;
        let lookups = memberships.iter().map(|m| self.tenants.get(&m.tenant_id));
        let profiles = try_join_all(lookups).await?;

        Ok(memberships
            .iter()
            .zip(profiles)
            .filter_map(|(membership, profile)| {
                if profile.is_none() {
                    debug!(tenant = %membership.tenant_id, "Membership for missing tenant");
                }
                profile
            })
            .collect())
    }
}

fn is_retryable(err: &UserError) -> bool {
    matches!(err, UserError::VersionConflict(_)) || err.kind().is_transient()
}
