//! # Actor References
//!
//! `ActorRef<T>` is the caller side of a keyed actor: a key plus the directory
//! that can route it. It is cheap to clone and holds no mailbox between calls.

use crate::directory::ActorDirectory;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::Envelope;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

/// Location-transparent handle to the actor for one key.
///
/// * **Bounded**: every call is limited by the directory's call timeout.
///   Dropping the call future (or timing out) withdraws it; the activation skips
///   withdrawn calls it has not started yet.
/// * **Typed errors**: runtime faults arrive as `T::Error` built from
///   [`FrameworkError`].
pub struct ActorRef<T: ActorEntity> {
    key: T::Key,
    directory: ActorDirectory<T>,
}

impl<T: ActorEntity> Clone for ActorRef<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            directory: self.directory.clone(),
        }
    }
}

impl<T: ActorEntity> ActorRef<T> {
    pub(crate) fn new(key: T::Key, directory: ActorDirectory<T>) -> Self {
        Self { key, directory }
    }

    pub fn key(&self) -> &T::Key {
        &self.key
    }

    /// Sends `request` to the activation for this key and awaits its reply.
    pub async fn call(&self, request: T::Request) -> Result<T::Response, T::Error> {
        let after = self.directory.config().call_timeout;
        match tokio::time::timeout(after, self.route(request)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(entity_type = T::KIND, key = %self.key, ?after, "Call timed out");
                Err(FrameworkError::Timeout {
                    kind: T::KIND,
                    key: self.key.to_string(),
                    after,
                }
                .into())
            }
        }
    }

    async fn route(&self, request: T::Request) -> Result<T::Response, T::Error> {
        let mut request = request;
        // A second attempt covers a mailbox that retired between lookup and send.
        for _ in 0..2 {
            let mailbox = self.directory.mailbox(&self.key)?;
            let (respond_to, response) = oneshot::channel();
            let envelope = Envelope {
                key: self.key.clone(),
                request,
                respond_to,
            };
            match mailbox.send(envelope).await {
                Ok(()) => {
                    return match response.await {
                        Ok(result) => result,
                        Err(_) => Err(FrameworkError::ActorDropped.into()),
                    };
                }
                Err(mpsc::error::SendError(returned)) => {
                    debug!(entity_type = T::KIND, key = %self.key, "Mailbox closed, re-routing");
                    self.directory.evict(&self.key, &mailbox);
                    request = returned.request;
                }
            }
        }
        Err(FrameworkError::ActorClosed.into())
    }
}
