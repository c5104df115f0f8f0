//! Request-scoped tenant context.

use crate::model::TenantProfile;
use serde::Serialize;

/// The tenant a request is scoped to, as resolved from its tenant header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantContext {
    /// System name; the value carried in `tenants` claims.
    pub id: String,
    /// Display name
    pub name: String,
    /// Tenant-scoped storage namespace
    pub storage_identifier: String,
}

impl From<TenantProfile> for TenantContext {
    fn from(profile: TenantProfile) -> Self {
        Self {
            id: profile.system_name,
            name: profile.name,
            storage_identifier: profile.storage_prefix.to_string(),
        }
    }
}

/// Outcome of tenant resolution for one request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TenantScope {
    /// No tenant header: the request is tenant-agnostic.
    #[default]
    Empty,
    /// A header named a tenant that does not exist.
    Unknown(String),
    Resolved(TenantContext),
}

impl TenantScope {
    pub fn tenant(&self) -> Option<&TenantContext> {
        match self {
            TenantScope::Resolved(tenant) => Some(tenant),
            TenantScope::Empty | TenantScope::Unknown(_) => None,
        }
    }

    /// System name of the resolved tenant.
    pub fn tenant_id(&self) -> Option<&str> {
        self.tenant().map(|tenant| tenant.id.as_str())
    }
}
