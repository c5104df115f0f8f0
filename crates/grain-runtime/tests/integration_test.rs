use async_trait::async_trait;
use grain_runtime::{ActorDirectory, ActorEntity, DirectoryConfig, FrameworkError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Barrier;

// --- Test Entity ---

#[derive(Default)]
struct Stats {
    activations: AtomicUsize,
    deactivations: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    failing_activations: AtomicUsize,
}

struct RecorderContext {
    stats: Arc<Stats>,
    rendezvous: Barrier,
}

#[derive(Debug)]
enum RecorderRequest {
    Work(Duration),
    Record(u32),
    Rendezvous,
}

#[derive(Debug, thiserror::Error)]
enum RecorderError {
    #[error("activation refused")]
    ActivationRefused,
    #[error(transparent)]
    Infrastructure(#[from] FrameworkError),
}

struct Recorder {
    log: Vec<u32>,
}

#[async_trait]
impl ActorEntity for Recorder {
    type Key = String;
    type Request = RecorderRequest;
    type Response = Vec<u32>;
    type Error = RecorderError;
    type Context = RecorderContext;
    const KIND: &'static str = "recorder";

    async fn activate(_key: &String, ctx: &RecorderContext) -> Result<Self, RecorderError> {
        let refused = ctx
            .stats
            .failing_activations
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if refused {
            return Err(RecorderError::ActivationRefused);
        }
        ctx.stats.activations.fetch_add(1, Ordering::SeqCst);
        Ok(Self { log: Vec::new() })
    }

    async fn handle(
        &mut self,
        request: RecorderRequest,
        ctx: &RecorderContext,
    ) -> Result<Vec<u32>, RecorderError> {
        let now = ctx.stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        ctx.stats.max_in_flight.fetch_max(now, Ordering::SeqCst);
        match request {
            RecorderRequest::Work(duration) => tokio::time::sleep(duration).await,
            RecorderRequest::Record(value) => self.log.push(value),
            RecorderRequest::Rendezvous => {
                ctx.rendezvous.wait().await;
            }
        }
        ctx.stats.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(self.log.clone())
    }

    async fn on_deactivate(&mut self, ctx: &RecorderContext) -> Result<(), RecorderError> {
        ctx.stats.deactivations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn recorder_directory(config: DirectoryConfig) -> (ActorDirectory<Recorder>, Arc<Stats>) {
    let stats = Arc::new(Stats::default());
    let context = RecorderContext {
        stats: Arc::clone(&stats),
        rendezvous: Barrier::new(2),
    };
    (ActorDirectory::new(context, config), stats)
}

// --- Tests ---

#[tokio::test]
async fn test_calls_for_one_key_are_serialized_in_order() {
    let (directory, stats) = recorder_directory(DirectoryConfig::default());

    let mut calls = Vec::new();
    for value in 0..10u32 {
        let actor = directory.get("k".to_string());
        calls.push(tokio::spawn(async move {
            actor.call(RecorderRequest::Work(Duration::from_millis(2))).await?;
            actor.call(RecorderRequest::Record(value)).await
        }));
    }
    for call in calls {
        call.await.unwrap().unwrap();
    }

    assert_eq!(stats.max_in_flight.load(Ordering::SeqCst), 1);
    assert_eq!(stats.activations.load(Ordering::SeqCst), 1);
    assert_eq!(directory.active_count(), 1);

    let log = directory
        .get("k".to_string())
        .call(RecorderRequest::Work(Duration::ZERO))
        .await
        .unwrap();
    assert_eq!(log.len(), 10);
}

#[tokio::test]
async fn test_same_key_preserves_arrival_order() {
    let (directory, _stats) = recorder_directory(DirectoryConfig::default());
    let actor = directory.get("ordered".to_string());

    for value in [3, 1, 2] {
        actor.call(RecorderRequest::Record(value)).await.unwrap();
    }
    let log = actor.call(RecorderRequest::Work(Duration::ZERO)).await.unwrap();
    assert_eq!(log, vec![3, 1, 2]);
}

#[tokio::test]
async fn test_different_keys_run_in_parallel() {
    // Both calls wait on a two-party barrier: they only finish if they overlap.
    let (directory, stats) = recorder_directory(DirectoryConfig {
        call_timeout: Duration::from_secs(2),
        ..DirectoryConfig::default()
    });

    let a = directory.get("a".to_string());
    let b = directory.get("b".to_string());
    let (ra, rb) = tokio::join!(
        a.call(RecorderRequest::Rendezvous),
        b.call(RecorderRequest::Rendezvous)
    );

    ra.unwrap();
    rb.unwrap();
    assert_eq!(stats.max_in_flight.load(Ordering::SeqCst), 2);
    assert_eq!(directory.active_count(), 2);
}

#[tokio::test]
async fn test_idle_activation_retires_and_reactivates() {
    let (directory, stats) = recorder_directory(DirectoryConfig {
        idle_timeout: Some(Duration::from_millis(50)),
        ..DirectoryConfig::default()
    });
    let actor = directory.get("idle".to_string());

    actor.call(RecorderRequest::Record(1)).await.unwrap();
    assert!(directory.is_active(&"idle".to_string()));

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(!directory.is_active(&"idle".to_string()));
    assert_eq!(stats.deactivations.load(Ordering::SeqCst), 1);

    // State is in-memory only here, so the fresh activation starts empty.
    let log = actor.call(RecorderRequest::Record(2)).await.unwrap();
    assert_eq!(log, vec![2]);
    assert_eq!(stats.activations.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_failed_activation_is_retried_on_next_call() {
    let (directory, stats) = recorder_directory(DirectoryConfig::default());
    stats.failing_activations.store(1, Ordering::SeqCst);
    let actor = directory.get("flaky".to_string());

    let first = actor.call(RecorderRequest::Record(1)).await;
    assert!(matches!(first, Err(RecorderError::ActivationRefused)));

    let second = actor.call(RecorderRequest::Record(2)).await.unwrap();
    assert_eq!(second, vec![2]);
    assert_eq!(stats.activations.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_call_times_out() {
    let (directory, _stats) = recorder_directory(DirectoryConfig {
        call_timeout: Duration::from_millis(50),
        ..DirectoryConfig::default()
    });

    let result = directory
        .get("slow".to_string())
        .call(RecorderRequest::Work(Duration::from_millis(500)))
        .await;

    match result {
        Err(RecorderError::Infrastructure(FrameworkError::Timeout { kind, key, .. })) => {
            assert_eq!(kind, "recorder");
            assert_eq!(key, "slow");
        }
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_abandoned_call_is_skipped() {
    let (directory, _stats) = recorder_directory(DirectoryConfig::default());
    let actor = directory.get("cancel".to_string());

    let busy = {
        let actor = actor.clone();
        tokio::spawn(async move {
            actor
                .call(RecorderRequest::Work(Duration::from_millis(150)))
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    // Queued behind the busy call, then given up on before it starts.
    let queued = actor.call(RecorderRequest::Record(99));
    let gave_up = tokio::time::timeout(Duration::from_millis(20), queued).await;
    assert!(gave_up.is_err());

    busy.await.unwrap().unwrap();
    let log = actor.call(RecorderRequest::Record(1)).await.unwrap();
    assert_eq!(log, vec![1]);
}

#[tokio::test]
async fn test_shutdown_rejects_new_calls() {
    let (directory, stats) = recorder_directory(DirectoryConfig::default());
    directory
        .get("a".to_string())
        .call(RecorderRequest::Record(1))
        .await
        .unwrap();

    directory.shutdown().await.unwrap();
    assert_eq!(directory.active_count(), 0);
    assert_eq!(stats.deactivations.load(Ordering::SeqCst), 1);

    let result = directory.get("a".to_string()).call(RecorderRequest::Record(2)).await;
    assert!(matches!(
        result,
        Err(RecorderError::Infrastructure(FrameworkError::DirectoryClosed))
    ));
}
