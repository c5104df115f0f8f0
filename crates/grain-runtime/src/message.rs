//! # Generic Messages
//!
//! The envelope carried from an [`ActorRef`](crate::ActorRef) to the activation
//! that owns its key.

use crate::entity::ActorEntity;
use tokio::sync::oneshot;

/// One-shot reply channel for a single call.
pub type Response<T> =
    oneshot::Sender<Result<<T as ActorEntity>::Response, <T as ActorEntity>::Error>>;

/// A call addressed to one key.
///
/// The key travels with the request so that mocks (which route every key to a
/// single mailbox) can assert on it.
pub struct Envelope<T: ActorEntity> {
    pub key: T::Key,
    pub request: T::Request,
    pub respond_to: Response<T>,
}

impl<T: ActorEntity> Envelope<T> {
    /// Returns `true` once the caller stopped waiting (timeout, cancellation).
    pub fn is_abandoned(&self) -> bool {
        self.respond_to.is_closed()
    }
}

impl<T: ActorEntity> std::fmt::Debug for Envelope<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Envelope")
            .field("key", &self.key)
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}
