//! Type-safe wrappers around [`ActorDirectory`](grain_runtime::ActorDirectory).

pub mod tenant_client;
pub mod user_client;

pub use tenant_client::*;
pub use user_client::*;
