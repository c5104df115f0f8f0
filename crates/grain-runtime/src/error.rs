//! # Framework Errors
//!
//! Errors raised by the runtime itself rather than by an entity. Every variant is
//! an infrastructure fault: callers must surface it, never read it as "not found".

use std::time::Duration;

/// Errors that can occur within the actor runtime itself.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor mailbox closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Call to {kind} actor {key} timed out after {after:?}")]
    Timeout {
        kind: &'static str,
        key: String,
        after: Duration,
    },
    #[error("Actor directory is shut down")]
    DirectoryClosed,
    #[error("Unexpected response from actor, expected {expected}")]
    UnexpectedResponse { expected: &'static str },
    #[error("{kind} activation {key} terminated abnormally")]
    ActivationFailed { kind: &'static str, key: String },
}
