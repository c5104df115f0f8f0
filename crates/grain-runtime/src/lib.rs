//! # Grain Runtime
//!
//! This crate hosts **virtual actors** on Tokio: entities addressed by a key,
//! activated on first use, processing their calls one at a time, and retired
//! again when idle. Callers never create or destroy an actor; they ask the
//! directory for a reference to a key and call it.
//!
//! ## Why Virtual Actors?
//!
//! A classic actor owns a whole collection and serializes every request to it.
//! A virtual actor owns exactly one key:
//!
//! - **Isolation per key**: two calls for the same key never overlap, so an
//!   entity mutates its state without locks. Calls for different keys run in
//!   parallel.
//! - **No lifecycle management at call sites**: the first call activates,
//!   the idle timeout retires, the next call activates again.
//! - **Location transparency**: an [`ActorRef`] is just a key plus a directory.
//!   It can be cloned and held anywhere without keeping an activation alive.
//!
//! **Further Reading**:
//! - [Orleans: Distributed Virtual Actors](https://www.microsoft.com/en-us/research/publication/orleans-distributed-virtual-actors-for-programmability-and-scalability/)
//! - [Actors in Rust](https://ryhl.io/blog/actors-with-tokio/) - Practical guide to implementing actors with Tokio
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - Your state and call handling
//! 2. **Runtime Layer** ([`KeyedActor`], [`ActorDirectory`]) - Activation, mailbox, serialization
//! 3. **Interface Layer** ([`ActorRef`], [`ActorClient`]) - Typed, bounded calls
//!
//! ## Quick Start
//!
//! ```rust
//! use async_trait::async_trait;
//! use grain_runtime::{ActorDirectory, ActorEntity, DirectoryConfig, FrameworkError};
//!
//! #[derive(Debug, thiserror::Error)]
//! enum GreeterError {
//!     #[error(transparent)]
//!     Infrastructure(#[from] FrameworkError),
//! }
//!
//! struct Greeter { name: String, greeted: u32 }
//!
//! #[async_trait]
//! impl ActorEntity for Greeter {
//!     type Key = String;
//!     type Request = ();
//!     type Response = String;
//!     type Error = GreeterError;
//!     type Context = ();
//!     const KIND: &'static str = "greeter";
//!
//!     async fn activate(key: &String, _: &()) -> Result<Self, GreeterError> {
//!         Ok(Self { name: key.clone(), greeted: 0 })
//!     }
//!
//!     async fn handle(&mut self, _: (), _: &()) -> Result<String, GreeterError> {
//!         self.greeted += 1;
//!         Ok(format!("hello {} #{}", self.name, self.greeted))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let directory = ActorDirectory::<Greeter>::new((), DirectoryConfig::default());
//!
//!     let alice = directory.get("alice".to_string());
//!     assert_eq!(alice.call(()).await.unwrap(), "hello alice #1");
//!     assert_eq!(alice.call(()).await.unwrap(), "hello alice #2");
//!     assert_eq!(directory.get("bob".to_string()).call(()).await.unwrap(), "hello bob #1");
//!
//!     directory.shutdown().await.unwrap();
//! }
//! ```
//!
//! ## Context Injection
//!
//! Every activation of a directory shares one `Context`, given to
//! [`ActorDirectory::new`]. An entity that calls other actors keeps their
//! directories (or clients built on them) in its context.
//!
//! ## Failure Model
//!
//! Entity errors are typed per entity. Runtime faults (closed mailbox, timeout,
//! shut-down directory) are [`FrameworkError`]s converted into the entity error,
//! so a caller always matches on one type and can tell an infrastructure fault
//! apart from a domain answer.
//!
//! ## Testing
//!
//! [`mock::MockActor`] routes every key of a directory to a scripted mailbox, so
//! client code can be tested without real activations. See the [`mock`] module.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod directory;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod tracing;

// Re-export core types for convenience
pub use actor::KeyedActor;
pub use client::ActorRef;
pub use client_trait::ActorClient;
pub use directory::{ActorDirectory, DirectoryConfig};
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{Envelope, Response};
