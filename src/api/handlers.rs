use super::error::ApiError;
use super::middleware::{Caller, Scope};
use super::state::AppState;
use crate::error::ErrorKind;
use crate::model::{TenantProfile, UserProfile};
use crate::tenancy::TenantScope;
use crate::validation::{RegistrationInput, TenantInput};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Missing fields deserialize as empty and fail validation with 400.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateTenantRequest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// =============================================================================
// Handlers
// =============================================================================

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /users/register`
pub async fn register(
    State(state): State<AppState>,
    Caller(caller): Caller,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserProfile>), ApiError> {
    let Json(body) = body?;
    let input = RegistrationInput {
        email: body.email,
        first_name: body.first_name,
        last_name: body.last_name,
    };
    let profile = state.system.registration.register(&caller.subject, input).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// `GET /users/me`
pub async fn me(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> Result<Json<UserProfile>, ApiError> {
    state
        .system
        .registration
        .profile(&caller.subject)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::new(ErrorKind::NotFound, "registration required"))
}

/// `POST /tenants`
pub async fn create_tenant(
    State(state): State<AppState>,
    Caller(caller): Caller,
    body: Result<Json<CreateTenantRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TenantProfile>), ApiError> {
    let Json(body) = body?;
    let input = TenantInput {
        name: body.name,
        description: body.description,
    };
    let tenant = state.system.provisioning.create(&caller.subject, input).await?;
    Ok((StatusCode::CREATED, Json(tenant)))
}

/// `GET /tenants`: the profile of the tenant named by the tenant header.
pub async fn current_tenant(
    State(state): State<AppState>,
    Caller(_): Caller,
    Scope(scope): Scope,
) -> Result<Json<TenantProfile>, ApiError> {
    match scope {
        TenantScope::Resolved(tenant) => state
            .system
            .tenants
            .get(&tenant.id)
            .await?
            .map(Json)
            .ok_or_else(|| tenant_not_found(&tenant.id)),
        TenantScope::Unknown(identifier) => Err(tenant_not_found(&identifier)),
        TenantScope::Empty => Err(ApiError::new(
            ErrorKind::Validation,
            format!("Missing {} header", state.system.resolver.header()),
        )),
    }
}

/// `GET /tenants/accessible`
pub async fn accessible_tenants(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> Result<Json<Vec<TenantProfile>>, ApiError> {
    let tenants = state.system.provisioning.accessible_tenants(&caller.subject).await?;
    Ok(Json(tenants))
}

fn tenant_not_found(identifier: &str) -> ApiError {
    ApiError::new(ErrorKind::NotFound, format!("Tenant not found: {}", identifier))
}
