//! Tenant resolution and authorization.
//!
//! A request names its tenant in a header. [`TenantResolver`] turns that into a
//! [`TenantScope`] via a [`TenantDirectory`], and [`authorize`] checks the
//! enriched caller's memberships against it.

mod authz;
mod context;
mod directory;
mod resolver;

pub use authz::{authorize, AuthzDecision, TenantAccessDenied};
pub use context::{TenantContext, TenantScope};
pub use directory::{ActorTenantDirectory, TenantDirectory, TenantDirectoryError};
pub use resolver::TenantResolver;
