//! Tenant actor: creation and lookup of one tenant.
//!
//! Keyed by the tenant's system name, which callers derive with
//! [`to_kebab_case`](crate::naming::to_kebab_case) before addressing the actor.

pub mod entity;
pub mod error;
mod requests;

pub use entity::{TenantActor, TenantActorContext};
pub use error::*;
pub use requests::*;

use crate::clients::TenantClient;
use crate::store::EntityStore;
use grain_runtime::{ActorDirectory, DirectoryConfig};
use std::sync::Arc;

/// Creates the Tenant actor directory and its client.
pub fn new(
    store: Arc<dyn EntityStore>,
    config: DirectoryConfig,
) -> (ActorDirectory<TenantActor>, TenantClient) {
    let directory = ActorDirectory::new(TenantActorContext { store }, config);
    let client = TenantClient::new(directory.clone());
    (directory, client)
}
