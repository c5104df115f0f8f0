//! Tenant membership authorization.

use super::context::TenantScope;
use crate::claims::RequestIdentity;
use thiserror::Error;
use tracing::warn;

/// Why a request was let through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthzDecision {
    /// The endpoint is tenant-agnostic.
    Exempt,
    /// No tenant was resolved for the request.
    NoTenant,
    /// No verified identity. Authentication is enforced elsewhere.
    Anonymous,
    /// The caller is a member of the tenant in scope.
    Granted,
}

/// The caller is not a member of the tenant in scope.
///
/// The fields are for logs only; the message shown to clients is generic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Access to the requested tenant is denied")]
pub struct TenantAccessDenied {
    pub tenant: String,
    pub known: Vec<String>,
}

/// Decides whether a request may proceed against the tenant in `scope`.
///
/// Only membership is checked, case-insensitively. Roles are not evaluated.
pub fn authorize(
    exempt: bool,
    scope: &TenantScope,
    identity: &RequestIdentity,
) -> Result<AuthzDecision, TenantAccessDenied> {
    if exempt {
        return Ok(AuthzDecision::Exempt);
    }
    let Some(tenant_id) = scope.tenant_id() else {
        return Ok(AuthzDecision::NoTenant);
    };
    let Some(principal) = identity.enriched() else {
        return Ok(AuthzDecision::Anonymous);
    };

    if principal.is_member_of(tenant_id) {
        return Ok(AuthzDecision::Granted);
    }

    warn!(
        subject = %principal.subject,
        tenant = tenant_id,
        known = ?principal.tenants,
        "Tenant access denied"
    );
    Err(TenantAccessDenied {
        tenant: tenant_id.to_string(),
        known: principal.tenants.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::{claim_types, enrich, Claim, Principal};
    use crate::model::TenantMembership;
    use crate::tenancy::TenantContext;

    fn scope(tenant: &str) -> TenantScope {
        TenantScope::Resolved(TenantContext {
            id: tenant.into(),
            name: tenant.into(),
            storage_identifier: "s".into(),
        })
    }

    fn member_of(tenants: &[&str], scope: &TenantScope) -> RequestIdentity {
        let base = Principal::authenticated(vec![Claim::new(claim_types::SUBJECT, "auth0|1")]);
        let memberships: Vec<_> = tenants
            .iter()
            .map(|t| TenantMembership::new(*t, ["reader"]))
            .collect();
        RequestIdentity::Authenticated(enrich(&base, &memberships, scope, None).unwrap())
    }

    #[test]
    fn test_membership_ignores_case() {
        let scope = scope("tenant1");
        let identity = member_of(&["Tenant1"], &scope);
        assert_eq!(authorize(false, &scope, &identity), Ok(AuthzDecision::Granted));
    }

    #[test]
    fn test_non_member_is_denied() {
        let scope = scope("globex");
        let identity = member_of(&["acme"], &scope);

        let denied = authorize(false, &scope, &identity).unwrap_err();
        assert_eq!(denied.tenant, "globex");
        assert_eq!(denied.known, vec!["acme"]);
        assert!(!denied.to_string().contains("globex"));
    }

    #[test]
    fn test_passes_without_a_tenant_or_identity() {
        let anonymous = RequestIdentity::Anonymous(Principal::anonymous());
        let stranger = member_of(&[], &TenantScope::Empty);

        assert_eq!(authorize(true, &scope("acme"), &stranger), Ok(AuthzDecision::Exempt));
        assert_eq!(authorize(false, &TenantScope::Empty, &stranger), Ok(AuthzDecision::NoTenant));
        assert_eq!(
            authorize(false, &TenantScope::Unknown("acme".into()), &stranger),
            Ok(AuthzDecision::NoTenant)
        );
        assert_eq!(authorize(false, &scope("acme"), &anonymous), Ok(AuthzDecision::Anonymous));
    }
}
