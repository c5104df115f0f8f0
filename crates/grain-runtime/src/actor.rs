//! # Keyed Actor
//!
//! `KeyedActor<T>` is the server half of one activation: it owns the entity for a
//! single key and the receiving end of that key's mailbox. The directory spawns
//! one per key, so calls for a key are processed strictly one at a time in
//! arrival order while different keys run in parallel.
//!
//! ## Lifecycle
//!
//! 1. **Spawn**: the directory creates the mailbox and spawns [`KeyedActor::run`].
//! 2. **Activate**: the first call that is still awaited triggers
//!    [`ActorEntity::activate`]. A failed activation is reported to that call and
//!    retried on the next one.
//! 3. **Serve**: each call runs to completion before the next is taken. A call
//!    whose caller already gave up (timeout, dropped request) is skipped before
//!    any work starts.
//! 4. **Retire**: with an idle timeout configured, an activation whose mailbox
//!    stays empty for that long removes itself from the directory, serves any call
//!    that raced with the removal, runs [`ActorEntity::on_deactivate`] and exits.
//!    Without one, it lives until the directory drops its mailbox.

use crate::directory::Registry;
use crate::entity::ActorEntity;
use crate::message::Envelope;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// One activation: the entity for a single key plus its mailbox.
///
/// **Concurrency Model**:
/// The entity is owned by the task running [`KeyedActor::run`]; nothing else can
/// reach it. That ownership is the whole mutual-exclusion story: no `Mutex`
/// guards entity state.
pub struct KeyedActor<T: ActorEntity> {
    key: T::Key,
    generation: u64,
    receiver: mpsc::Receiver<Envelope<T>>,
    context: Arc<T::Context>,
    idle_timeout: Option<Duration>,
    registry: Weak<Registry<T>>,
}

impl<T: ActorEntity> KeyedActor<T> {
    pub(crate) fn new(
        key: T::Key,
        generation: u64,
        receiver: mpsc::Receiver<Envelope<T>>,
        context: Arc<T::Context>,
        idle_timeout: Option<Duration>,
        registry: Weak<Registry<T>>,
    ) -> Self {
        Self {
            key,
            generation,
            receiver,
            context,
            idle_timeout,
            registry,
        }
    }

    /// Runs the activation until its mailbox closes or it retires.
    pub async fn run(mut self) {
        let entity_type = T::KIND;
        let mut instance: Option<T> = None;
        debug!(entity_type, key = %self.key, generation = self.generation, "Activation spawned");

        loop {
            let next = match self.idle_timeout {
                Some(idle) => match tokio::time::timeout(idle, self.receiver.recv()).await {
                    Ok(next) => next,
                    Err(_) => {
                        if self.retire() {
                            debug!(entity_type, key = %self.key, "Idle, retiring");
                            break;
                        }
                        continue;
                    }
                },
                None => self.receiver.recv().await,
            };

            match next {
                Some(envelope) => self.dispatch(&mut instance, envelope).await,
                None => break,
            }
        }

        // Calls that were queued while retiring are still served here.
        self.receiver.close();
        while let Ok(envelope) = self.receiver.try_recv() {
            self.dispatch(&mut instance, envelope).await;
        }

        if let Some(mut entity) = instance {
            if let Err(e) = entity.on_deactivate(&self.context).await {
                warn!(entity_type, key = %self.key, error = %e, "on_deactivate failed");
            }
        }
        info!(entity_type, key = %self.key, "Deactivated");
    }

    async fn dispatch(&self, instance: &mut Option<T>, envelope: Envelope<T>) {
        let entity_type = T::KIND;
        if envelope.is_abandoned() {
            debug!(entity_type, key = %self.key, "Caller gone, call skipped");
            return;
        }
        let Envelope {
            request,
            respond_to,
            ..
        } = envelope;

        if instance.is_none() {
            match T::activate(&self.key, &self.context).await {
                Ok(entity) => {
                    info!(entity_type, key = %self.key, "Activated");
                    *instance = Some(entity);
                }
                Err(e) => {
                    warn!(entity_type, key = %self.key, error = %e, "Activation failed");
                    let _ = respond_to.send(Err(e));
                    return;
                }
            }
        }
        let Some(entity) = instance.as_mut() else {
            return;
        };

        debug!(entity_type, key = %self.key, ?request, "Call");
        let result = entity.handle(request, &self.context).await;
        if let Err(e) = &result {
            warn!(entity_type, key = %self.key, error = %e, "Call failed");
        }
        let _ = respond_to.send(result);
    }

    fn retire(&self) -> bool {
        match self.registry.upgrade() {
            Some(registry) => registry.retire(&self.key, self.generation, &self.receiver),
            None => true,
        }
    }
}
