//! Pure claims transform.

use super::principal::{claim_types, EnrichedPrincipal, Principal};
use crate::model::{TenantMembership, UserProfile};
use crate::tenancy::TenantScope;
use std::collections::BTreeSet;

/// Builds the enriched view of `base` from the user's memberships and profile.
///
/// Returns `None` for an unauthenticated principal or one without a subject.
/// Role claims are taken only from the membership matching the tenant in
/// `scope`; roles held in any other tenant never leak into the result. Email
/// and name come from `base` when present there, otherwise from `profile`.
pub fn enrich(
    base: &Principal,
    memberships: &[TenantMembership],
    scope: &TenantScope,
    profile: Option<&UserProfile>,
) -> Option<EnrichedPrincipal> {
    if !base.is_authenticated() {
        return None;
    }
    let subject = base.subject()?.to_string();

    let email = base
        .find_first(claim_types::EMAIL)
        .map(str::to_string)
        .or_else(|| profile.map(|p| p.email.clone()));
    let name = base
        .find_first(claim_types::NAME)
        .map(str::to_string)
        .or_else(|| profile.map(UserProfile::full_name));

    let tenants = memberships.iter().map(|m| m.tenant_id.clone()).collect();

    let scoped_tenant = scope.tenant_id().map(str::to_string);
    let roles: BTreeSet<String> = scoped_tenant
        .as_deref()
        .and_then(|tenant_id| memberships.iter().find(|m| m.is_for(tenant_id)))
        .map(|m| m.roles.clone())
        .unwrap_or_default();

    Some(EnrichedPrincipal::new(
        base.clone(),
        subject,
        email,
        name,
        tenants,
        scoped_tenant,
        roles,
    ))
}
