//! Claims principals.
//!
//! [`Principal`] is the wire form: an ordered bag of `(type, value)` claims as
//! issued by the identity provider. [`EnrichedPrincipal`] is the typed form the
//! pipeline hands to authorization; it is turned back into claims only at the
//! outermost layer with [`EnrichedPrincipal::to_principal`].

use std::collections::{BTreeSet, HashSet};

/// Claim types of the wire contract.
pub mod claim_types {
    pub const SUBJECT: &str = "sub";
    pub const EMAIL: &str = "email";
    pub const NAME: &str = "name";
    /// One claim per tenant membership.
    pub const TENANTS: &str = "tenants";
    /// One claim per role in the tenant in scope.
    pub const ROLE: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Claim {
    pub claim_type: String,
    pub value: String,
}

impl Claim {
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }
}

/// An identity as a list of claims.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Principal {
    claims: Vec<Claim>,
    authenticated: bool,
}

impl Principal {
    /// A request without verified identity.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A verified identity.
    pub fn authenticated(claims: Vec<Claim>) -> Self {
        Self {
            claims,
            authenticated: true,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// First non-empty value of `claim_type`.
    pub fn find_first<'a>(&'a self, claim_type: &'a str) -> Option<&'a str> {
        self.find_all(claim_type).next()
    }

    /// Non-empty values of `claim_type`, in order.
    pub fn find_all<'a>(&'a self, claim_type: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.claims
            .iter()
            .filter(move |claim| claim.claim_type == claim_type)
            .map(|claim| claim.value.as_str())
            .filter(|value| !value.is_empty())
    }

    pub fn subject(&self) -> Option<&str> {
        self.find_first(claim_types::SUBJECT)
    }
}

/// The caller after enrichment: base claims plus memberships and the roles of
/// the tenant in scope.
///
/// Built fresh for every request and never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedPrincipal {
    base: Principal,
    pub subject: String,
    pub email: Option<String>,
    pub name: Option<String>,
    /// Tenant system names, one per membership
    pub tenants: Vec<String>,
    /// The tenant whose roles were added, if any
    pub scoped_tenant: Option<String>,
    /// Roles held in `scoped_tenant` only
    pub roles: BTreeSet<String>,
}

impl EnrichedPrincipal {
    pub(crate) fn new(
        base: Principal,
        subject: String,
        email: Option<String>,
        name: Option<String>,
        tenants: Vec<String>,
        scoped_tenant: Option<String>,
        roles: BTreeSet<String>,
    ) -> Self {
        Self {
            base,
            subject,
            email,
            name,
            tenants,
            scoped_tenant,
            roles,
        }
    }

    /// The principal this one was built from, unchanged.
    pub fn base(&self) -> &Principal {
        &self.base
    }

    /// Membership check, ignoring case.
    pub fn is_member_of(&self, tenant_id: &str) -> bool {
        self.tenants.iter().any(|t| t.eq_ignore_ascii_case(tenant_id))
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Wire claims: every base claim followed by the additions, without
    /// duplicates.
    pub fn to_principal(&self) -> Principal {
        let mut additions = Vec::new();
        if self.base.find_first(claim_types::EMAIL).is_none() {
            if let Some(email) = &self.email {
                additions.push(Claim::new(claim_types::EMAIL, email));
            }
        }
        if self.base.find_first(claim_types::NAME).is_none() {
            if let Some(name) = &self.name {
                additions.push(Claim::new(claim_types::NAME, name));
            }
        }
        additions.extend(self.tenants.iter().map(|t| Claim::new(claim_types::TENANTS, t)));
        additions.extend(self.roles.iter().map(|r| Claim::new(claim_types::ROLE, r)));

        let mut seen = HashSet::new();
        let claims = self
            .base
            .claims()
            .iter()
            .cloned()
            .chain(additions)
            .filter(|claim| seen.insert(claim.clone()))
            .collect();
        Principal::authenticated(claims)
    }
}

/// Identity of one request after the claims pipeline ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestIdentity {
    /// No verified identity; the principal passed through untouched.
    Anonymous(Principal),
    Authenticated(EnrichedPrincipal),
}

impl RequestIdentity {
    pub fn enriched(&self) -> Option<&EnrichedPrincipal> {
        match self {
            RequestIdentity::Authenticated(principal) => Some(principal),
            RequestIdentity::Anonymous(_) => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.enriched().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_skips_empty_values() {
        let principal = Principal::authenticated(vec![
            Claim::new("sub", ""),
            Claim::new("sub", "auth0|1"),
        ]);
        assert_eq!(principal.subject(), Some("auth0|1"));
        assert!(Principal::anonymous().subject().is_none());
        assert!(!Principal::anonymous().is_authenticated());
    }

    #[test]
    fn test_find_first_with_runtime_claim_type() {
        let principal = Principal::authenticated(vec![
            Claim::new(claim_types::EMAIL, ""),
            Claim::new(claim_types::EMAIL, "a@b.com"),
            Claim::new(claim_types::EMAIL, "c@d.com"),
        ]);
        let claim_type = claim_types::EMAIL.to_string();
        assert_eq!(principal.find_first(&claim_type), Some("a@b.com"));
        assert!(principal.find_first("missing").is_none());
    }

    #[test]
    fn test_to_principal_keeps_base_and_dedupes() {
        let base = Principal::authenticated(vec![
            Claim::new(claim_types::SUBJECT, "auth0|1"),
            Claim::new(claim_types::EMAIL, "idp@b.com"),
            Claim::new(claim_types::TENANTS, "acme"),
        ]);
        let enriched = EnrichedPrincipal::new(
            base.clone(),
            "auth0|1".into(),
            Some("idp@b.com".into()),
            Some("John Doe".into()),
            vec!["acme".into(), "globex".into()],
            Some("acme".into()),
            BTreeSet::from(["owner".to_string()]),
        );

        let wire = enriched.to_principal();
        assert_eq!(
            wire.claims(),
            &[
                Claim::new(claim_types::SUBJECT, "auth0|1"),
                Claim::new(claim_types::EMAIL, "idp@b.com"),
                Claim::new(claim_types::TENANTS, "acme"),
                Claim::new(claim_types::NAME, "John Doe"),
                Claim::new(claim_types::TENANTS, "globex"),
                Claim::new(claim_types::ROLE, "owner"),
            ]
        );
        // The input principal is untouched.
        assert_eq!(enriched.base(), &base);
        assert!(enriched.is_member_of("ACME"));
    }
}
