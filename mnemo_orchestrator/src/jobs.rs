use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use mnemo_core::{EmbeddingAdapter, Message, Scope};
use mnemo_extraction::ExtractionEngine;
use mnemo_store::Store;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Per-scope extraction job state machine: `idle` ->
/// `scheduled` -> `running` -> `idle`. A trigger while `scheduled` or
/// `running` coalesces into a no-op — the next trigger after completion
/// re-windows instead of queueing a duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobState {
    Idle,
    Scheduled,
    Running,
}

pub struct ExtractionJob {
    pub scope: Scope,
    pub window: Vec<Message>,
}

/// Schedules extraction jobs onto a bounded worker pool without ever
/// blocking the caller.
pub struct JobScheduler {
    states: Mutex<HashMap<String, JobState>>,
    sender: mpsc::Sender<ExtractionJob>,
}

impl JobScheduler {
    /// Spawns `worker_count` background loops draining the job queue
    /// (default `num_cpus` or 4). Each worker runs extraction, embeds each
    /// surviving fragment via `embedder`, then inserts it into `store`.
    #[must_use]
    pub fn start(
        engine: Arc<ExtractionEngine>,
        store: Arc<Store>,
        embedder: Arc<dyn EmbeddingAdapter>,
        worker_count: usize,
    ) -> Arc<Self> {
        let (sender, receiver) = mpsc::channel(256);
        let receiver = Arc::new(tokio::sync::Mutex::new(receiver));

        let scheduler = Arc::new(Self { states: Mutex::new(HashMap::new()), sender });

        for worker_id in 0..worker_count.max(1) {
            let receiver = receiver.clone();
            let engine = engine.clone();
            let store = store.clone();
            let embedder = embedder.clone();
            let scheduler = scheduler.clone();

            tokio::spawn(async move {
                loop {
                    let job = {
                        let mut receiver = receiver.lock().await;
                        receiver.recv().await
                    };

                    let Some(job) = job else {
                        info!("extraction worker {worker_id} shutting down: channel closed");
                        break;
                    };

                    scheduler.mark_running(&job.scope);
                    run_job(&engine, &store, embedder.as_ref(), &job).await;
                    scheduler.mark_idle(&job.scope);
                }
            });
        }

        scheduler
    }

    /// Triggers extraction over `window` for `scope`, coalescing with any
    /// job already `scheduled` or `running` for that scope. Never blocks:
    /// enqueueing uses `try_send`, and a full queue just drops the trigger
    /// (the next turn's trigger will re-window anyway).
    pub fn trigger(&self, scope: Scope, window: Vec<Message>) {
        let scope_key = scope.partition_key();
        let mut states = self.states.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        let current = states.get(&scope_key).copied().unwrap_or(JobState::Idle);
        if current != JobState::Idle {
            return;
        }

        states.insert(scope_key, JobState::Scheduled);
        drop(states);

        if self.sender.try_send(ExtractionJob { scope: scope.clone(), window }).is_err() {
            warn!("extraction queue full, dropping trigger for scope");
            self.mark_idle(&scope);
        }
    }

    fn mark_running(&self, scope: &Scope) {
        let mut states = self.states.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        states.insert(scope.partition_key(), JobState::Running);
    }

    fn mark_idle(&self, scope: &Scope) {
        let mut states = self.states.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        states.insert(scope.partition_key(), JobState::Idle);
    }
}

async fn run_job(engine: &ExtractionEngine, store: &Store, embedder: &dyn EmbeddingAdapter, job: &ExtractionJob) {
    let mut fragments = engine.extract(&job.window).await;
    let mut persisted = 0usize;

    for fragment in &mut fragments {
        match embedder.embed(&fragment.content).await {
            Ok(embedding) => fragment.embedding = Some(embedding),
            Err(e) => {
                warn!("failed to embed extracted fragment, skipping insert: {e}");
                continue;
            }
        }

        match store.insert(&job.scope, fragment).await {
            Ok(_) => persisted += 1,
            Err(e) => warn!("failed to persist extracted fragment: {e}"),
        }
    }

    info!("extraction job completed: {persisted} fragments persisted");
}
