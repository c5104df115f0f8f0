//! Multi-actor workflows behind the HTTP surface.

mod provisioning;
mod registration;

pub use provisioning::{GrantPolicy, ProvisioningError, TenantProvisioning};
pub use registration::{RegistrationError, UserRegistration};
