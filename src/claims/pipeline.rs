//! Claims enrichment against the User actor.

use super::principal::{Principal, RequestIdentity};
use super::transform::enrich;
use crate::clients::UserClient;
use crate::error::ErrorKind;
use crate::tenancy::TenantScope;
use crate::user_actor::UserError;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, instrument};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum EnrichmentError {
    /// The User actor could not answer for the caller.
    #[error("User lookup failed for {subject}: {source}")]
    UserLookup {
        subject: String,
        #[source]
        source: UserError,
    },

    #[error("Claims enrichment timed out after {0:?}")]
    Timeout(Duration),
}

impl EnrichmentError {
    /// Enrichment is fail-closed: every failure is an infrastructure fault.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Infrastructure
    }
}

/// Adds tenant memberships, scoped roles and profile data to the caller's
/// claims on every request.
#[derive(Clone)]
pub struct ClaimsEnricher {
    users: UserClient,
    timeout: Duration,
}

impl ClaimsEnricher {
    pub fn new(users: UserClient, timeout: Duration) -> Self {
        Self { users, timeout }
    }

    /// Runs the pipeline for one request.
    ///
    /// An unauthenticated principal, or one without a subject, comes back as
    /// [`RequestIdentity::Anonymous`] and no actor is called. Otherwise the
    /// caller's memberships and profile are read concurrently. Any failure
    /// fails the request; partially enriched claims are never returned.
    #[instrument(
        skip_all,
        fields(subject = base.subject().unwrap_or_default(), tenant = scope.tenant_id())
    )]
    pub async fn enrich(
        &self,
        base: Principal,
        scope: &TenantScope,
    ) -> Result<RequestIdentity, EnrichmentError> {
        let Some(subject) = base.subject().filter(|_| base.is_authenticated()) else {
            return Ok(RequestIdentity::Anonymous(base));
        };

        let lookup = async {
            tokio::try_join!(self.users.get_tenants(subject), self.users.get_profile(subject))
        };
        let (memberships, profile) = match tokio::time::timeout(self.timeout, lookup).await {
            Ok(Ok(found)) => found,
            Ok(Err(source)) => {
                error!(error = %source, "Claims enrichment failed");
                return Err(EnrichmentError::UserLookup {
                    subject: subject.to_string(),
                    source,
                });
            }
            Err(_) => {
                error!(after = ?self.timeout, "Claims enrichment timed out");
                return Err(EnrichmentError::Timeout(self.timeout));
            }
        };

        match enrich(&base, &memberships, scope, profile.as_ref()) {
            Some(enriched) => {
                debug!(
                    tenants = enriched.tenants.len(),
                    roles = enriched.roles.len(),
                    "Claims enriched"
                );
                Ok(RequestIdentity::Authenticated(enriched))
            }
            None => Ok(RequestIdentity::Anonymous(base)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::{claim_types, Claim};
    use crate::model::{TenantMembership, UserProfile};
    use crate::tenancy::TenantContext;
    use crate::user_actor::{UserActor, UserRequest, UserResponse};
    use chrono::Utc;
    use grain_runtime::mock::{create_mock_directory, expect_call, MockActor};
    use grain_runtime::FrameworkError;
    use uuid::Uuid;

    fn caller() -> Principal {
        Principal::authenticated(vec![Claim::new(claim_types::SUBJECT, "auth0|1")])
    }

    fn scope(tenant: &str) -> TenantScope {
        TenantScope::Resolved(TenantContext {
            id: tenant.into(),
            name: tenant.into(),
            storage_identifier: "s".into(),
        })
    }

    fn profile() -> UserProfile {
        UserProfile {
            id: Uuid::now_v7(),
            email: "a@b.com".into(),
            first_name: "John".into(),
            last_name: "Doe".into(),
            registered_at: Utc::now(),
        }
    }

    /// Serves every call for the test's duration from fixed data.
    fn serve_user(memberships: Vec<TenantMembership>, profile: Option<UserProfile>) -> UserClient {
        let (directory, mut receiver) = create_mock_directory::<UserActor>(10);
        tokio::spawn(async move {
            while let Some((_, request, responder)) = expect_call(&mut receiver).await {
                let reply = match request {
                    UserRequest::GetTenants => UserResponse::GetTenants(memberships.clone()),
                    UserRequest::GetProfile => UserResponse::GetProfile(profile.clone()),
                    other => panic!("Unexpected request: {:?}", other),
                };
                let _ = responder.send(Ok(reply));
            }
        });
        UserClient::new(directory)
    }

    #[tokio::test]
    async fn test_anonymous_passes_through_without_actor_calls() {
        // Any call would panic: nothing is scripted.
        let mock = MockActor::<UserActor>::new();
        let users = UserClient::new(mock.directory());
        let enricher = ClaimsEnricher::new(users, Duration::from_secs(1));

        let identity = enricher.enrich(Principal::anonymous(), &scope("acme")).await.unwrap();
        assert_eq!(identity, RequestIdentity::Anonymous(Principal::anonymous()));

        let no_sub = Principal::authenticated(vec![Claim::new(claim_types::EMAIL, "a@b.com")]);
        let identity = enricher.enrich(no_sub.clone(), &TenantScope::Empty).await.unwrap();
        assert_eq!(identity, RequestIdentity::Anonymous(no_sub));
        mock.verify();
    }

    #[tokio::test]
    async fn test_role_isolation_across_tenants() {
        let users = serve_user(
            vec![
                TenantMembership::new("tenant-a", ["admin"]),
                TenantMembership::new("tenant-b", ["reader"]),
            ],
            Some(profile()),
        );
        let enricher = ClaimsEnricher::new(users, Duration::from_secs(1));

        let identity = enricher.enrich(caller(), &scope("tenant-a")).await.unwrap();
        let enriched = identity.enriched().unwrap();
        assert_eq!(enriched.tenants, vec!["tenant-a", "tenant-b"]);
        assert!(enriched.has_role("admin"));
        assert!(!enriched.has_role("reader"));
        assert_eq!(enriched.email.as_deref(), Some("a@b.com"));

        let wire = enriched.to_principal();
        let roles: Vec<_> = wire.find_all(claim_types::ROLE).collect();
        assert_eq!(roles, vec!["admin"]);
    }

    #[tokio::test]
    async fn test_actor_failure_fails_closed() {
        let mut mock = MockActor::<UserActor>::new();
        mock.expect_call("auth0|1".into())
            .return_err(UserError::Infrastructure(FrameworkError::ActorDropped));
        mock.expect_call("auth0|1".into()).return_ok(UserResponse::GetProfile(None));
        let users = UserClient::new(mock.directory());
        let enricher = ClaimsEnricher::new(users, Duration::from_secs(1));

        let err = enricher.enrich(caller(), &TenantScope::Empty).await.unwrap_err();
        assert!(
            matches!(err, EnrichmentError::UserLookup { ref subject, .. } if subject == "auth0|1")
        );
        assert_eq!(err.kind(), ErrorKind::Infrastructure);
    }

    #[tokio::test]
    async fn test_slow_user_actor_times_out() {
        // Calls are received and never answered.
        let (directory, mut receiver) = create_mock_directory::<UserActor>(10);
        let held = tokio::spawn(async move {
            let mut pending = Vec::new();
            while let Some(call) = expect_call(&mut receiver).await {
                pending.push(call);
            }
        });
        let enricher = ClaimsEnricher::new(UserClient::new(directory), Duration::from_millis(20));

        let err = enricher.enrich(caller(), &TenantScope::Empty).await.unwrap_err();
        assert_eq!(err, EnrichmentError::Timeout(Duration::from_millis(20)));
        held.abort();
    }
}
