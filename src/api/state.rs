use super::auth::IdentityProvider;
use crate::lifecycle::TenancySystem;
use std::sync::Arc;

/// Shared state for the middleware and handlers.
#[derive(Clone)]
pub struct AppState {
    pub system: TenancySystem,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(system: TenancySystem, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { system, identity }
    }
}
