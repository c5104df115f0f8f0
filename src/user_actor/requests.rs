//! Calls accepted by the User actor.
//!
//! See [`UserActor`](super::UserActor) for how each one is handled.

use crate::model::{TenantMembership, UserProfile};

/// Calls for one identity.
#[derive(Debug, Clone)]
pub enum UserRequest {
    /// Single-shot registration. Fails once the identity is registered.
    Register {
        email: String,
        first_name: String,
        last_name: String,
    },
    GetProfile,
    /// Memberships; empty when unregistered.
    GetTenants,
    /// Idempotent: merges `roles` into the membership for `tenant_id`.
    GrantMembership { tenant_id: String, roles: Vec<String> },
}

/// Replies - variants match 1:1 with [`UserRequest`]
#[derive(Debug, Clone)]
pub enum UserResponse {
    Register(UserProfile),
    GetProfile(Option<UserProfile>),
    GetTenants(Vec<TenantMembership>),
    /// `true` when the grant changed anything
    GrantMembership(bool),
}
