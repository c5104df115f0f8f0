//! HTTP surface.
//!
//! | Route | Tenant scope | Success |
//! |-------|--------------|---------|
//! | `POST /users/register` | agnostic | 201 user profile |
//! | `GET /users/me` | agnostic | 200 user profile |
//! | `POST /tenants` | agnostic | 201 tenant profile |
//! | `GET /tenants` | tenant header | 200 tenant profile |
//! | `GET /tenants/accessible` | agnostic | 200 tenant profiles |
//!
//! Every route above runs behind [`middleware::request_pipeline`].

pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

pub use auth::{IdentityProvider, StaticIdentityProvider};
pub use error::ApiError;
pub use state::AppState;

use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;

pub const REGISTER: &str = "/users/register";
pub const ME: &str = "/users/me";
pub const TENANTS: &str = "/tenants";
pub const ACCESSIBLE_TENANTS: &str = "/tenants/accessible";

/// Routes that never resolve a tenant and skip tenant authorization.
pub fn is_tenant_agnostic(method: &Method, path: &str) -> bool {
    matches!(
        (method.as_str(), path),
        ("POST", REGISTER) | ("GET", ME) | ("POST", TENANTS) | ("GET", ACCESSIBLE_TENANTS)
    )
}

/// Create the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(REGISTER, post(handlers::register))
        .route(ME, get(handlers::me))
        .route(TENANTS, get(handlers::current_tenant).post(handlers::create_tenant))
        .route(ACCESSIBLE_TENANTS, get(handlers::accessible_tenants))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::request_pipeline,
        ))
        .route("/health", get(handlers::health))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_current_tenant_is_scoped() {
        assert!(is_tenant_agnostic(&Method::POST, REGISTER));
        assert!(is_tenant_agnostic(&Method::GET, ME));
        assert!(is_tenant_agnostic(&Method::POST, TENANTS));
        assert!(is_tenant_agnostic(&Method::GET, ACCESSIBLE_TENANTS));
        assert!(!is_tenant_agnostic(&Method::GET, TENANTS));
    }
}
