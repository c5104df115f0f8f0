use crate::model::TenantProfile;

/// Calls for one tenant system name.
#[derive(Debug, Clone)]
pub enum TenantRequest {
    /// Strict create-once; the display name must derive to the actor key.
    Create {
        name: String,
        description: String,
        created_by: String,
    },
    Get,
}

/// Replies - variants match 1:1 with [`TenantRequest`]
#[derive(Debug, Clone)]
pub enum TenantResponse {
    Create(TenantProfile),
    Get(Option<TenantProfile>),
}
