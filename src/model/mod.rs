//! Persisted actor states and the profiles they expose.

pub mod tenant;
pub mod user;

pub use tenant::*;
pub use user::*;
