use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// One tenant the user belongs to, with the roles held there.
///
/// `tenant_id` is the tenant's system name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantMembership {
    pub tenant_id: String,
    pub roles: BTreeSet<String>,
}

impl TenantMembership {
    pub fn new<I, S>(tenant_id: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tenant_id: tenant_id.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// Tenant ids compare case-insensitively everywhere.
    pub fn is_for(&self, tenant_id: &str) -> bool {
        self.tenant_id.eq_ignore_ascii_case(tenant_id)
    }
}

/// Persisted state of one User actor.
///
/// The default value is the unregistered user: every activation starts from it
/// when the store has no record for the identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserState {
    /// Opaque entity id assigned at registration
    pub id: Option<Uuid>,
    /// Identity-provider subject id. Empty until registered.
    pub identity_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// At most one entry per tenant id
    pub tenants: Vec<TenantMembership>,
    pub registered_at: Option<DateTime<Utc>>,
}

impl UserState {
    pub fn is_registered(&self) -> bool {
        !self.identity_id.is_empty()
    }

    /// The public view of a registered user.
    pub fn profile(&self) -> Option<UserProfile> {
        if !self.is_registered() {
            return None;
        }
        Some(UserProfile {
            id: self.id?,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            registered_at: self.registered_at?,
        })
    }

    pub fn membership(&self, tenant_id: &str) -> Option<&TenantMembership> {
        self.tenants.iter().find(|m| m.is_for(tenant_id))
    }

    /// Adds `roles` in `tenant_id`, creating the membership if needed.
    /// Returns `false` when the user already had all of them.
    pub fn grant<I, S>(&mut self, tenant_id: &str, roles: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.tenants.iter_mut().find(|m| m.is_for(tenant_id)) {
            Some(existing) => roles
                .into_iter()
                .fold(false, |changed, role| existing.roles.insert(role.into()) || changed),
            None => {
                self.tenants.push(TenantMembership::new(tenant_id, roles));
                true
            }
        }
    }
}

/// Registered user as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub registered_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
