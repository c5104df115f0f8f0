//! Tenant directory backed by Tenant actors.
//!
//! Multi-tenancy resolution asks a [`TenantDirectory`] for tenants by
//! identifier. The actor-backed implementation serves those lookups from Tenant
//! actor state, so there is no second tenant table to keep in sync. It is
//! read-only: tenants are created through the Tenant actor alone.

use super::context::TenantContext;
use crate::clients::TenantClient;
use crate::error::ErrorKind;
use crate::tenant_actor::TenantError;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TenantDirectoryError {
    /// The directory does not implement this operation.
    #[error("Tenant directory operation not supported: {0}")]
    NotSupported(&'static str),

    /// The Tenant actor could not answer. Never read as "not found".
    #[error("Tenant lookup failed for {identifier}: {source}")]
    Lookup {
        identifier: String,
        #[source]
        source: TenantError,
    },
}

impl TenantDirectoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TenantDirectoryError::NotSupported(_) => ErrorKind::Validation,
            TenantDirectoryError::Lookup { .. } => ErrorKind::Infrastructure,
        }
    }
}

/// Tenant store interface consumed by tenant resolution.
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    /// Finds a tenant by its system name.
    async fn resolve_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<TenantContext>, TenantDirectoryError>;

    async fn list_all(&self) -> Result<Vec<TenantContext>, TenantDirectoryError>;

    async fn add(&self, tenant: TenantContext) -> Result<(), TenantDirectoryError>;

    async fn update(&self, tenant: TenantContext) -> Result<(), TenantDirectoryError>;

    async fn remove(&self, identifier: &str) -> Result<(), TenantDirectoryError>;
}

/// Read-only [`TenantDirectory`] over Tenant actors.
#[derive(Clone)]
pub struct ActorTenantDirectory {
    tenants: TenantClient,
}

impl ActorTenantDirectory {
    pub fn new(tenants: TenantClient) -> Self {
        Self { tenants }
    }
}

#[async_trait]
impl TenantDirectory for ActorTenantDirectory {
    async fn resolve_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<TenantContext>, TenantDirectoryError> {
        match self.tenants.get(identifier).await {
            Ok(profile) => {
                debug!(tenant = identifier, found = profile.is_some(), "Tenant resolved");
                Ok(profile.map(TenantContext::from))
            }
            Err(source) => {
                error!(tenant = identifier, error = %source, "Tenant lookup failed");
                Err(TenantDirectoryError::Lookup {
                    identifier: identifier.to_string(),
                    source,
                })
            }
        }
    }

    async fn list_all(&self) -> Result<Vec<TenantContext>, TenantDirectoryError> {
        Err(TenantDirectoryError::NotSupported("list_all"))
    }

    async fn add(&self, _tenant: TenantContext) -> Result<(), TenantDirectoryError> {
        Err(TenantDirectoryError::NotSupported("add"))
    }

    async fn update(&self, _tenant: TenantContext) -> Result<(), TenantDirectoryError> {
        Err(TenantDirectoryError::NotSupported("update"))
    }

    async fn remove(&self, _identifier: &str) -> Result<(), TenantDirectoryError> {
        Err(TenantDirectoryError::NotSupported("remove"))
    }
}
