use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persisted state of one Tenant actor. Empty `system_name` means the tenant
/// was never created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantState {
    pub system_name: String,
    pub name: String,
    pub description: String,
    /// Tenant-scoped storage namespace, assigned once
    pub storage_prefix: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
    /// Identity id of the creator, who is granted the owner role
    #[serde(default)]
    pub created_by: String,
}

impl TenantState {
    pub fn exists(&self) -> bool {
        !self.system_name.is_empty()
    }

    pub fn profile(&self) -> Option<TenantProfile> {
        if !self.exists() {
            return None;
        }
        Some(TenantProfile {
            system_name: self.system_name.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            storage_prefix: self.storage_prefix?,
            created_at: self.created_at?,
        })
    }
}

/// Tenant as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantProfile {
    pub system_name: String,
    pub name: String,
    pub description: String,
    pub storage_prefix: Uuid,
    pub created_at: DateTime<Utc>,
}
