//! # ActorClient Trait
//!
//! Common interface for entity-specific clients. A client wraps an
//! [`ActorDirectory`] and gets an instrumented `call` for free; its own methods
//! then translate between domain arguments and the entity's request/response
//! enums.
use crate::{ActorDirectory, ActorEntity};
use async_trait::async_trait;

/// Trait for entity-specific clients built on an [`ActorDirectory`].
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use grain_runtime::{ActorClient, ActorDirectory, ActorEntity, DirectoryConfig, FrameworkError};
///
/// #[derive(Debug, thiserror::Error)]
/// enum CounterError {
///     #[error(transparent)]
///     Infrastructure(#[from] FrameworkError),
/// }
///
/// struct Counter { hits: u64 }
///
/// #[async_trait]
/// impl ActorEntity for Counter {
///     type Key = String;
///     type Request = ();
///     type Response = u64;
///     type Error = CounterError;
///     type Context = ();
///     const KIND: &'static str = "counter";
///
///     async fn activate(_: &String, _: &()) -> Result<Self, CounterError> { Ok(Self { hits: 0 }) }
///     async fn handle(&mut self, _: (), _: &()) -> Result<u64, CounterError> {
///         self.hits += 1;
///         Ok(self.hits)
///     }
/// }
///
/// struct CounterClient { directory: ActorDirectory<Counter> }
///
/// impl ActorClient<Counter> for CounterClient {
///     fn directory(&self) -> &ActorDirectory<Counter> { &self.directory }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let directory = ActorDirectory::new((), DirectoryConfig::default());
///     let client = CounterClient { directory };
///     assert_eq!(client.call("page".into(), ()).await.unwrap(), 1);
///     assert_eq!(client.call("page".into(), ()).await.unwrap(), 2);
/// }
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// Access the directory hosting the entity.
    fn directory(&self) -> &ActorDirectory<T>;

    /// Send one call to the actor for `key`.
    #[tracing::instrument(skip(self), fields(kind = T::KIND))]
    async fn call(&self, key: T::Key, request: T::Request) -> Result<T::Response, T::Error> {
        tracing::debug!("Sending request");
        self.directory().get(key).call(request).await
    }
}
