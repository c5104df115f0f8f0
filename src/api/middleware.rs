//! The request pipeline.
//!
//! Every routed request goes through the same four steps, in order:
//!
//! 1. bearer authentication (a bad token is 401, no token is anonymous)
//! 2. tenant resolution from the tenant header, skipped on tenant-agnostic
//!    routes and for anonymous callers
//! 3. claims enrichment from the caller's User actor (any failure is 503)
//! 4. tenant authorization (403 for a non-member)
//!
//! The outcome is left in request extensions as a [`TenantScope`] and a
//! [`RequestIdentity`] for the handlers.

use super::auth::bearer_token;
use super::error::ApiError;
use super::is_tenant_agnostic;
use super::state::AppState;
use crate::claims::{EnrichedPrincipal, Principal, RequestIdentity};
use crate::tenancy::{authorize, TenantScope};
use axum::extract::{FromRequestParts, MatchedPath, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

pub async fn request_pipeline(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let exempt = request
        .extensions()
        .get::<MatchedPath>()
        .is_some_and(|path| is_tenant_agnostic(request.method(), path.as_str()));

    let headers = request.headers().clone();

    let principal = match bearer_token(&headers)? {
        Some(token) => state.identity.authenticate(token).await?,
        None => Principal::anonymous(),
    };

    // Anonymous callers never activate a Tenant actor.
    let scope = if exempt || !principal.is_authenticated() {
        TenantScope::Empty
    } else {
        state.system.resolver.resolve(&headers).await?
    };

    let identity = state.system.enricher.enrich(principal, &scope).await?;
    let decision = authorize(exempt, &scope, &identity)?;
    debug!(?decision, tenant = scope.tenant_id(), "Request authorized");

    request.extensions_mut().insert(scope);
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// The authenticated, enriched caller. Rejects anonymous requests with 401.
#[derive(Debug, Clone)]
pub struct Caller(pub EnrichedPrincipal);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<RequestIdentity>() {
            Some(RequestIdentity::Authenticated(principal)) => Ok(Caller(principal.clone())),
            _ => Err(ApiError::unauthorized()),
        }
    }
}

/// The tenant scope the pipeline resolved. Empty on tenant-agnostic routes.
#[derive(Debug, Clone)]
pub struct Scope(pub TenantScope);

impl<S: Send + Sync> FromRequestParts<S> for Scope {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Scope(parts.extensions.get::<TenantScope>().cloned().unwrap_or_default()))
    }
}
