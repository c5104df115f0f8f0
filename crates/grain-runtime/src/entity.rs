//! # ActorEntity Trait
//!
//! The `ActorEntity` trait defines the contract a keyed actor implementation must
//! satisfy to be hosted by the runtime. Where the classic resource actor owns a
//! whole collection, an `ActorEntity` owns exactly **one** key: the directory
//! creates one activation per key and routes every call for that key to it.
//!
//! # Associated Types
//! - `Key`: the addressing key (e.g. an identity-provider subject id).
//! - `Request` / `Response`: the call protocol, usually an enum whose variants
//!   match 1:1.
//! - `Error`: the typed failure of the entity. It must absorb
//!   [`FrameworkError`] so that runtime faults reach the caller through the same
//!   type, tagged as infrastructure faults.
//! - `Context`: dependencies shared by every activation (store handles, other
//!   clients). It is injected once into the directory and handed to each hook.
//!
//! # Hooks
//! - [`ActorEntity::activate`] runs lazily, right before the first call that
//!   reaches a fresh activation. It loads persisted state.
//! - [`ActorEntity::handle`] processes one call. Calls never overlap for a key.
//! - [`ActorEntity::on_deactivate`] runs when an idle activation retires.

use crate::error::FrameworkError;
use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any keyed entity must implement to be managed by a
/// [`KeyedActor`](crate::KeyedActor).
#[async_trait]
pub trait ActorEntity: Sized + Send + 'static {
    /// The addressing key of one activation.
    type Key: Eq + Hash + Clone + Send + Sync + Display + Debug + 'static;

    /// The call payload accepted by the entity.
    type Request: Send + Debug + 'static;

    /// The reply produced for a call.
    type Response: Send + Debug + 'static;

    /// The typed failure of this entity.
    ///
    /// # Design Note: Error Granularity
    ///
    /// One error enum per actor, not one per request variant. Clients match on a
    /// single type; the union is slightly wider than any one call needs.
    type Error: std::error::Error + From<FrameworkError> + Send + Sync + 'static;

    /// Dependencies injected into every activation.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync + 'static;

    /// Short label used in logs and timeout errors.
    const KIND: &'static str;

    /// Load the activation for `key`. Called inside the activation task, before
    /// the first call it serves. A failure is returned to that call and the next
    /// call tries again.
    async fn activate(key: &Self::Key, ctx: &Self::Context) -> Result<Self, Self::Error>;

    /// Handle one call.
    async fn handle(
        &mut self,
        request: Self::Request,
        ctx: &Self::Context,
    ) -> Result<Self::Response, Self::Error>;

    /// Called once when an idle activation retires.
    async fn on_deactivate(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }
}
