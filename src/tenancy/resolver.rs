//! Tenant resolution from the request header.

use super::context::TenantScope;
use super::directory::{TenantDirectory, TenantDirectoryError};
use axum::http::HeaderMap;
use std::sync::Arc;
use tracing::debug;

/// Reads the tenant header and looks the named tenant up.
#[derive(Clone)]
pub struct TenantResolver {
    header: String,
    directory: Arc<dyn TenantDirectory>,
}

impl TenantResolver {
    pub fn new(header: impl Into<String>, directory: Arc<dyn TenantDirectory>) -> Self {
        Self {
            header: header.into(),
            directory,
        }
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    /// Resolves the tenant named by `headers`.
    ///
    /// A missing, empty or non-UTF-8 header yields [`TenantScope::Empty`]. The
    /// identifier is lowercased before lookup since system names are always
    /// lowercase.
    pub async fn resolve(&self, headers: &HeaderMap) -> Result<TenantScope, TenantDirectoryError> {
        let identifier = headers
            .get(self.header.as_str())
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim().to_ascii_lowercase())
            .filter(|value| !value.is_empty());

        let Some(identifier) = identifier else {
            return Ok(TenantScope::Empty);
        };

        match self.directory.resolve_by_identifier(&identifier).await? {
            Some(tenant) => Ok(TenantScope::Resolved(tenant)),
            None => {
                debug!(tenant = %identifier, "Unknown tenant");
                Ok(TenantScope::Unknown(identifier))
            }
        }
    }
}
