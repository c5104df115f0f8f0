//! # Tenancy Core
//!
//! > **Multi-tenant identity on keyed virtual actors.**
//!
//! Users and tenants each live in their own actor, activated on first call and
//! retired when idle. Every authenticated request is enriched with the caller's
//! tenant memberships and then checked against the tenant it is scoped to.
//!
//! ## 🏗️ Design
//!
//! ### One writer per entity
//! All calls for a user (keyed by identity-provider subject) or a tenant (keyed
//! by system name) are served by a single activation, one at a time. The store's
//! version check is the only safety net across processes: a conflicting write
//! fails and the activation reloads before its next call.
//!
//! ### Fail-closed enrichment
//! Claims are rebuilt from the User actor on every request, never cached. If
//! the actor cannot answer, the request fails with 503 rather than continuing
//! with fewer claims than the caller really has.
//!
//! ### Roles stay in their tenant
//! Role claims are only ever taken from the membership of the tenant in scope.
//! Admin in one tenant is nothing in another.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Actors ([`user_actor`], [`tenant_actor`])
//! [`ActorEntity`](grain_runtime::ActorEntity) implementations with their
//! requests, responses and errors. State goes through [`store`].
//!
//! ### 2. The Interface ([`clients`])
//! Typed wrappers over the actor directories:
//! [`UserClient`](clients::UserClient), [`TenantClient`](clients::TenantClient).
//!
//! ### 3. Request Security ([`claims`], [`tenancy`])
//! [`ClaimsEnricher`](claims::ClaimsEnricher) builds the caller's
//! [`EnrichedPrincipal`](claims::EnrichedPrincipal);
//! [`TenantResolver`](tenancy::TenantResolver) and
//! [`authorize`](tenancy::authorize) scope and guard the request.
//!
//! ### 4. Workflows ([`workflow`])
//! Registration and the create-tenant-then-grant-owner saga.
//!
//! ### 5. The Orchestrator ([`lifecycle`]) and the Surface ([`api`])
//! [`TenancySystem`](lifecycle::TenancySystem) wires everything;
//! [`api::router`] exposes it over HTTP.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! TENANCY_DEV_TOKENS="alice-token=auth0|alice,alice@example.com,Alice" \
//!     RUST_LOG=info cargo run
//! ```

pub mod api;
pub mod claims;
pub mod clients;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod naming;
pub mod store;
pub mod tenancy;
pub mod tenant_actor;
pub mod user_actor;
pub mod validation;
pub mod workflow;
