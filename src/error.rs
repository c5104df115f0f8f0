//! Error taxonomy shared by every layer.
//!
//! Each layer keeps its own `thiserror` enum (`UserError`, `TenantError`,
//! `EnrichmentError`, ...). What they share is a *kind*: the HTTP surface and
//! the provisioning saga only ever branch on [`ErrorKind`], never on a concrete
//! variant from another layer.

use std::fmt;

/// Classification of a failure, independent of the layer that raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input, rejected before any actor is called.
    Validation,
    /// The entity does not exist.
    NotFound,
    /// Uniqueness violation or version mismatch.
    Conflict,
    /// No verified identity.
    Unauthorized,
    /// Verified identity without the required tenant entitlement.
    Forbidden,
    /// Store or actor runtime unreachable. Never to be read as `NotFound`.
    Infrastructure,
}

impl ErrorKind {
    /// Whether retrying the same operation later may succeed.
    pub fn is_transient(self) -> bool {
        matches!(self, ErrorKind::Infrastructure)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::Infrastructure => "infrastructure",
        };
        f.write_str(label)
    }
}
