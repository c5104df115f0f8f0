//! # System Lifecycle
//!
//! Wiring the actors together is where the complexity lives. [`TenancySystem`]
//! builds both directories over one store and hands their clients to the layers
//! above them:
//!
//! - the claims enricher and provisioning workflow read through `UserClient`
//! - the tenant resolver reads through an `ActorTenantDirectory`
//!
//! ## Graceful Shutdown
//!
//! [`TenancySystem::shutdown`] closes both directories: new calls fail with
//! `DirectoryClosed`, each activation drains the calls already queued, runs its
//! deactivation hook and exits. The shutdown returns once every task finished.
//!
//! ## Observability
//!
//! [`setup_tracing`] installs the `fmt` subscriber filtered by `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=info cargo run      # Lifecycle and workflow events
//! RUST_LOG=debug cargo run     # Every actor call
//! ```

mod system;

pub use grain_runtime::tracing::setup_tracing;
pub use system::TenancySystem;
