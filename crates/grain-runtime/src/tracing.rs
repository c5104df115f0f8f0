//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the process-wide subscriber.
//!
//! The runtime wraps every activation in an `actor` span carrying `kind` and
//! `key`, so anything an entity logs is attributed to the activation that did
//! it:
//!
//! ```text
//! INFO actor{kind="user" key="auth0|123"}: Activated
//! DEBUG actor{kind="user" key="auth0|123"}: Call request=GetTenants
//! WARN actor{kind="tenant" key="acme"}: Call failed error=Tenant already exists: acme (Acme)
//! ```
//!
//! Verbosity follows `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=info cargo run      # lifecycle only
//! RUST_LOG=debug cargo run     # every call with its payload
//! ```

/// Initializes a compact `tracing` subscriber filtered by `RUST_LOG`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
