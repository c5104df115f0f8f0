//! # Actor Directory
//!
//! The directory maps a key to its live activation. It is the piece that turns
//! a plain mailbox actor into a *virtual* actor:
//!
//! - **Location transparency**: callers hold an [`ActorRef`] built from a key and
//!   never see the mailbox behind it.
//! - **Lazy activation**: the first call for a key spawns its [`KeyedActor`].
//! - **Single activation**: the activation map is guarded so that at most one
//!   live activation exists per key; every call for that key lands in the same
//!   mailbox and is therefore serialized.
//!
//! Retired activations (idle timeout) remove their own entry. A caller that
//! raced and still holds the old mailbox sees it closed, evicts it and is
//! re-routed to a fresh activation by [`ActorRef::call`].

use crate::actor::KeyedActor;
use crate::client::ActorRef;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::Envelope;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, Instrument};

/// Tuning knobs shared by every activation of a directory.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Capacity of each activation's mailbox. Callers wait when it is full.
    pub mailbox_capacity: usize,
    /// Upper bound for one call, queueing included.
    pub call_timeout: Duration,
    /// Retire activations whose mailbox stayed empty this long. `None` keeps
    /// activations alive until shutdown.
    pub idle_timeout: Option<Duration>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: 32,
            call_timeout: Duration::from_secs(5),
            idle_timeout: None,
        }
    }
}

struct Activation<T: ActorEntity> {
    sender: mpsc::Sender<Envelope<T>>,
    generation: u64,
    handle: JoinHandle<()>,
}

enum Routing<T: ActorEntity> {
    /// Spawn one activation per key, sharing this context.
    Activate(Arc<T::Context>),
    /// Route every key to one externally owned mailbox (mocks).
    Pinned(mpsc::Sender<Envelope<T>>),
}

pub(crate) struct Registry<T: ActorEntity> {
    activations: Mutex<HashMap<T::Key, Activation<T>>>,
    routing: Routing<T>,
    config: DirectoryConfig,
    next_generation: AtomicU64,
    closed: AtomicBool,
}

impl<T: ActorEntity> Registry<T> {
    fn lock(&self) -> MutexGuard<'_, HashMap<T::Key, Activation<T>>> {
        // The guarded map is never left half-updated, so a poisoned lock is safe to reuse.
        self.activations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Removes the activation `generation` of `key` if its mailbox is empty.
    /// Returns `true` when the calling activation should stop.
    pub(crate) fn retire(
        &self,
        key: &T::Key,
        generation: u64,
        receiver: &mpsc::Receiver<Envelope<T>>,
    ) -> bool {
        let mut activations = self.lock();
        match activations.get(key) {
            Some(activation) if activation.generation == generation => {
                if !receiver.is_empty() {
                    return false;
                }
                activations.remove(key);
                true
            }
            // Replaced or already removed: this activation is orphaned.
            _ => true,
        }
    }
}

/// Key-addressed registry of activations for one entity type.
///
/// Cloning is cheap; clones share the same activations.
pub struct ActorDirectory<T: ActorEntity> {
    registry: Arc<Registry<T>>,
}

impl<T: ActorEntity> Clone for ActorDirectory<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<T: ActorEntity> ActorDirectory<T> {
    /// Creates a directory whose activations share `context`.
    pub fn new(context: T::Context, config: DirectoryConfig) -> Self {
        Self::with_routing(Routing::Activate(Arc::new(context)), config)
    }

    /// Creates a directory that routes every key to `mailbox` without spawning
    /// activations. Used by [`crate::mock`].
    pub fn pinned(mailbox: mpsc::Sender<Envelope<T>>, config: DirectoryConfig) -> Self {
        Self::with_routing(Routing::Pinned(mailbox), config)
    }

    fn with_routing(routing: Routing<T>, config: DirectoryConfig) -> Self {
        Self {
            registry: Arc::new(Registry {
                activations: Mutex::new(HashMap::new()),
                routing,
                config,
                next_generation: AtomicU64::new(1),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Returns a location-transparent reference to the actor for `key`.
    ///
    /// Nothing is spawned until the first call.
    pub fn get(&self, key: T::Key) -> ActorRef<T> {
        ActorRef::new(key, self.clone())
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.registry.config
    }

    /// Number of live activations.
    pub fn active_count(&self) -> usize {
        self.registry.lock().len()
    }

    /// Whether `key` currently has a live activation.
    pub fn is_active(&self, key: &T::Key) -> bool {
        self.registry
            .lock()
            .get(key)
            .is_some_and(|activation| !activation.sender.is_closed())
    }

    /// Returns the mailbox for `key`, spawning an activation when none is live.
    pub(crate) fn mailbox(
        &self,
        key: &T::Key,
    ) -> Result<mpsc::Sender<Envelope<T>>, FrameworkError> {
        let context = match &self.registry.routing {
            Routing::Pinned(mailbox) => {
                if self.registry.closed.load(Ordering::Acquire) {
                    return Err(FrameworkError::DirectoryClosed);
                }
                return Ok(mailbox.clone());
            }
            Routing::Activate(context) => context,
        };

        let mut activations = self.registry.lock();
        if self.registry.closed.load(Ordering::Acquire) {
            return Err(FrameworkError::DirectoryClosed);
        }
        if let Some(activation) = activations.get(key) {
            if !activation.sender.is_closed() {
                return Ok(activation.sender.clone());
            }
        }

        let generation = self.registry.next_generation.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::channel(self.registry.config.mailbox_capacity);
        let actor = KeyedActor::new(
            key.clone(),
            generation,
            receiver,
            Arc::clone(context),
            self.registry.config.idle_timeout,
            Arc::downgrade(&self.registry),
        );
        let span = tracing::info_span!("actor", kind = T::KIND, key = %key);
        let handle = tokio::spawn(actor.run().instrument(span));
        debug!(
            entity_type = T::KIND,
            %key,
            generation,
            size = activations.len() + 1,
            "Activation registered"
        );
        activations.insert(
            key.clone(),
            Activation {
                sender: sender.clone(),
                generation,
                handle,
            },
        );
        Ok(sender)
    }

    /// Drops the entry for `key` if it still points at `stale`.
    pub(crate) fn evict(&self, key: &T::Key, stale: &mpsc::Sender<Envelope<T>>) {
        let mut activations = self.registry.lock();
        if activations
            .get(key)
            .is_some_and(|activation| activation.sender.same_channel(stale))
        {
            activations.remove(key);
        }
    }

    /// Gracefully shuts down every activation.
    ///
    /// 1. Marks the directory closed; later calls fail with
    ///    [`FrameworkError::DirectoryClosed`].
    /// 2. Drops every mailbox, letting each activation finish its queue.
    /// 3. Awaits all activation tasks and reports the first abnormal exit.
    pub async fn shutdown(&self) -> Result<(), FrameworkError> {
        let drained: Vec<(T::Key, Activation<T>)> = {
            let mut activations = self.registry.lock();
            self.registry.closed.store(true, Ordering::Release);
            activations.drain().collect()
        };
        info!(entity_type = T::KIND, count = drained.len(), "Shutting down directory");

        let mut failure = None;
        for (key, activation) in drained {
            drop(activation.sender);
            if let Err(e) = activation.handle.await {
                error!(entity_type = T::KIND, %key, error = %e, "Activation task failed");
                failure.get_or_insert(FrameworkError::ActivationFailed {
                    kind: T::KIND,
                    key: key.to_string(),
                });
            }
        }
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
