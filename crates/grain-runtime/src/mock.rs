//! # Mock Framework
//!
//! A mock is an [`ActorDirectory`] whose every key routes to one mailbox you
//! control. Clients built on it behave exactly as in production, but each call
//! is answered from a script instead of by a real activation.
//!
//! ## When to use Mocks vs Real Actors
//!
//! | Feature | MockActor | Real Activation |
//! |---------|-----------|-----------------|
//! | **State** | None (scripted replies) | Loaded from the store |
//! | **Error Injection** | Easy (`return_err`) | Needs a broken store |
//! | **Use Case** | Logic *around* a client | The entity itself, full system |
//!
//! Two styles are available:
//!
//! - [`MockActor`]: queue expectations up front, then [`MockActor::verify`].
//! - [`create_mock_directory`] + [`expect_call`]: inspect each envelope by hand
//!   and answer it yourself, useful when the reply depends on the request.

use crate::directory::{ActorDirectory, DirectoryConfig};
use crate::entity::ActorEntity;
use crate::message::{Envelope, Response};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

struct Expectation<T: ActorEntity> {
    key: T::Key,
    response: Result<T::Response, T::Error>,
}

type Script<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A scripted stand-in for a keyed actor.
///
/// # Example
/// ```ignore
/// let mut users = MockActor::<UserActor>::new();
/// users.expect_call("auth0|1".to_string()).return_ok(UserResponse::GetTenants(vec![]));
///
/// let client = UserClient::new(users.directory());
/// // exercise code that uses the client...
/// users.verify();
/// ```
pub struct MockActor<T: ActorEntity> {
    directory: ActorDirectory<T>,
    expectations: Script<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> MockActor<T> {
    /// Creates a mock with no expectations. Must be called inside a runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<Envelope<T>>(100);
        let expectations: Script<T> = Arc::new(Mutex::new(VecDeque::new()));
        let script = Arc::clone(&expectations);

        let handle = tokio::spawn(async move {
            while let Some(envelope) = receiver.recv().await {
                let next = script.lock().expect("mock script poisoned").pop_front();
                match next {
                    Some(expected) => {
                        assert_eq!(envelope.key, expected.key, "call routed to unexpected key");
                        let _ = envelope.respond_to.send(expected.response);
                    }
                    None => panic!("Unexpected call: {:?}", envelope),
                }
            }
        });

        Self {
            directory: ActorDirectory::pinned(sender, DirectoryConfig::default()),
            expectations,
            _handle: handle,
        }
    }

    /// The directory to build clients from.
    pub fn directory(&self) -> ActorDirectory<T> {
        self.directory.clone()
    }

    /// Expects the next call to target `key`.
    pub fn expect_call(&mut self, key: T::Key) -> CallExpectationBuilder<T> {
        CallExpectationBuilder {
            key,
            expectations: Arc::clone(&self.expectations),
        }
    }

    /// Panics if scripted calls were never made.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().expect("mock script poisoned").len();
        if remaining != 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

impl<T: ActorEntity> Default for MockActor<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for one scripted call.
pub struct CallExpectationBuilder<T: ActorEntity> {
    key: T::Key,
    expectations: Script<T>,
}

impl<T: ActorEntity> CallExpectationBuilder<T> {
    /// Answers the call with `response`.
    pub fn return_ok(self, response: T::Response) {
        self.push(Ok(response));
    }

    /// Answers the call with `error`.
    pub fn return_err(self, error: T::Error) {
        self.push(Err(error));
    }

    fn push(self, response: Result<T::Response, T::Error>) {
        self.expectations
            .lock()
            .expect("mock script poisoned")
            .push_back(Expectation {
                key: self.key,
                response,
            });
    }
}

/// Creates a directory routed to a receiver the test drives by hand.
pub fn create_mock_directory<T: ActorEntity>(
    buffer_size: usize,
) -> (ActorDirectory<T>, mpsc::Receiver<Envelope<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ActorDirectory::pinned(sender, DirectoryConfig::default()), receiver)
}

/// Waits for the next call and splits it into key, request and responder.
pub async fn expect_call<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<Envelope<T>>,
) -> Option<(T::Key, T::Request, Response<T>)> {
    receiver
        .recv()
        .await
        .map(|envelope| (envelope.key, envelope.request, envelope.respond_to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameworkError;
    use async_trait::async_trait;

    #[derive(Debug, thiserror::Error)]
    enum EchoError {
        #[error("refused")]
        Refused,
        #[error(transparent)]
        Infrastructure(#[from] FrameworkError),
    }

    struct Echo;

    #[async_trait]
    impl ActorEntity for Echo {
        type Key = String;
        type Request = String;
        type Response = String;
        type Error = EchoError;
        type Context = ();
        const KIND: &'static str = "echo";

        async fn activate(_: &String, _: &()) -> Result<Self, EchoError> {
            Ok(Echo)
        }

        async fn handle(&mut self, request: String, _: &()) -> Result<String, EchoError> {
            Ok(request)
        }
    }

    #[tokio::test]
    async fn test_mock_directory_by_hand() {
        let (directory, mut receiver) = create_mock_directory::<Echo>(10);

        let call = tokio::spawn(async move { directory.get("a".into()).call("ping".into()).await });

        let (key, request, responder) = expect_call(&mut receiver).await.expect("Expected a call");
        assert_eq!(key, "a");
        assert_eq!(request, "ping");
        responder.send(Ok("pong".into())).unwrap();

        assert_eq!(call.await.unwrap().unwrap(), "pong");
    }

    #[tokio::test]
    async fn test_mock_actor_with_expectations() {
        let mut mock = MockActor::<Echo>::new();
        mock.expect_call("a".into()).return_ok("first".into());
        mock.expect_call("b".into()).return_err(EchoError::Refused);

        let directory = mock.directory();
        assert_eq!(directory.get("a".into()).call("x".into()).await.unwrap(), "first");
        let refused = directory.get("b".into()).call("y".into()).await;
        assert!(matches!(refused, Err(EchoError::Refused)));

        mock.verify();
    }

    #[tokio::test]
    async fn test_dropped_mock_mailbox_is_infrastructure_error() {
        let (directory, receiver) = create_mock_directory::<Echo>(1);
        drop(receiver);

        let result = directory.get("a".into()).call("x".into()).await;
        assert!(matches!(
            result,
            Err(EchoError::Infrastructure(FrameworkError::ActorClosed))
        ));
    }
}
