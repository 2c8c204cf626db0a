//! Background verification worker pool.
//!
//! The [`JobManager`] owns a bounded in-memory queue of link set ids and a
//! fixed number of worker loops draining it. The queue is only a trigger:
//! completion is always derived from the stored set status, so a restart that
//! loses the queue rebuilds the work list from [`LinkSetRepository::list_unfinished`].
//!
//! # Processing Flow
//!
//! 1. A set id is enqueued (recovery scan at construction, or the submission path)
//! 2. A worker pops the id and loads the set
//! 3. Every distinct link without a terminal result is probed concurrently:
//!    marked `processing`, probed, then stored with its terminal state
//! 4. The worker waits for the whole set before taking the next id
//!
//! Repeated triggers for the same id are harmless because resolved links are
//! skipped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc, mpsc::error::TrySendError};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use crate::domain::entities::LinkResult;
use crate::domain::probe::LinkProbe;
use crate::domain::repositories::{LinkSetRepository, StoreError};
use crate::domain::verification::probe_and_record;

/// Worker pool settings.
#[derive(Debug, Clone)]
pub struct WorkerPoolConfig {
    /// Number of parallel worker loops.
    pub workers: usize,
    /// Capacity of the job queue.
    pub queue_capacity: usize,
    /// How long [`JobManager::stop`] lets an in-flight set keep probing.
    /// `None` waits for the set to finish.
    pub stop_grace: Option<Duration>,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            workers: 5,
            queue_capacity: 1000,
            stop_grace: None,
        }
    }
}

/// Queue of link set ids plus the workers verifying them.
pub struct JobManager<R: LinkSetRepository + 'static> {
    repository: Arc<R>,
    probe: Arc<dyn LinkProbe>,
    config: WorkerPoolConfig,
    sender: mpsc::Sender<i64>,
    receiver: Arc<Mutex<mpsc::Receiver<i64>>>,
    shutdown: CancellationToken,
    tracker: TaskTracker,
}

impl<R: LinkSetRepository + 'static> JobManager<R> {
    /// Creates the manager and re-queues every unfinished set.
    ///
    /// # Errors
    ///
    /// Returns the store error if the recovery scan fails.
    pub async fn new(
        repository: Arc<R>,
        probe: Arc<dyn LinkProbe>,
        config: WorkerPoolConfig,
    ) -> Result<Self, StoreError> {
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));

        let manager = Self {
            repository,
            probe,
            config,
            sender,
            receiver: Arc::new(Mutex::new(receiver)),
            shutdown: CancellationToken::new(),
            tracker: TaskTracker::new(),
        };

        let unfinished = manager.repository.list_unfinished().await?;
        if !unfinished.is_empty() {
            info!(count = unfinished.len(), "Re-queueing unfinished link sets");
        }
        for set in unfinished {
            manager.enqueue(set.id);
        }

        Ok(manager)
    }

    /// Queues a set for verification without blocking the caller.
    ///
    /// When the queue is full a detached task waits for room, so the id is
    /// delivered eventually unless the pool is stopped first.
    pub fn enqueue(&self, id: i64) {
        match self.sender.try_send(id) {
            Ok(()) => debug!(set_id = id, "link set queued"),
            Err(TrySendError::Full(id)) => {
                debug!(set_id = id, "job queue full, deferring enqueue");
                let sender = self.sender.clone();
                let shutdown = self.shutdown.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        sent = sender.send(id) => {
                            if sent.is_err() {
                                warn!(set_id = id, "job queue closed, trigger dropped");
                            }
                        }
                        _ = shutdown.cancelled() => {
                            debug!(set_id = id, "stopped before the queue had room");
                        }
                    }
                });
            }
            Err(TrySendError::Closed(id)) => {
                warn!(set_id = id, "job queue closed, trigger dropped");
            }
        }
    }

    /// Runs the worker loops until all of them have exited.
    pub async fn run(&self) {
        info!(workers = self.config.workers, "Verification workers started");

        for worker_id in 0..self.config.workers {
            self.tracker.spawn(self.worker(worker_id).run());
        }
        self.tracker.close();
        self.tracker.wait().await;

        info!("Verification workers stopped");
    }

    /// Signals the workers to stop and waits for them.
    ///
    /// A worker finishes the set it is processing (bounded by
    /// [`WorkerPoolConfig::stop_grace`] when set) and takes no further ids.
    /// Sets left unfinished stay `processing` in the store and are picked up
    /// by the recovery scan on the next start.
    pub async fn stop(&self) {
        info!("Stopping verification workers");
        self.shutdown.cancel();
        self.tracker.close();
        self.tracker.wait().await;
    }

    /// Maximum number of queued ids.
    pub fn queue_capacity(&self) -> usize {
        self.sender.max_capacity()
    }

    /// Number of ids currently waiting in the queue.
    pub fn queued(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }

    pub fn is_stopping(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    fn worker(&self, id: usize) -> Worker<R> {
        Worker {
            id,
            repository: self.repository.clone(),
            probe: self.probe.clone(),
            receiver: self.receiver.clone(),
            shutdown: self.shutdown.clone(),
            stop_grace: self.config.stop_grace,
        }
    }
}

struct Worker<R: LinkSetRepository + 'static> {
    id: usize,
    repository: Arc<R>,
    probe: Arc<dyn LinkProbe>,
    receiver: Arc<Mutex<mpsc::Receiver<i64>>>,
    shutdown: CancellationToken,
    stop_grace: Option<Duration>,
}

impl<R: LinkSetRepository + 'static> Worker<R> {
    async fn run(self) {
        debug!(worker = self.id, "worker started");
        while let Some(set_id) = self.next_job().await {
            self.process_set(set_id).await;
        }
        debug!(worker = self.id, "worker exited");
    }

    /// Waits for the next id; `None` once stopped or the queue is closed.
    async fn next_job(&self) -> Option<i64> {
        if self.shutdown.is_cancelled() {
            return None;
        }

        let mut queue = tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => return None,
            guard = self.receiver.lock() => guard,
        };

        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => None,
            id = queue.recv() => id,
        }
    }

    async fn process_set(&self, set_id: i64) {
        let set = match self.repository.get_set(set_id).await {
            Ok(set) => set,
            Err(e) => {
                error!(worker = self.id, set_id, error = %e, "failed to load link set");
                return;
            }
        };

        let pending = set.unresolved_links();
        if pending.is_empty() {
            debug!(worker = self.id, set_id, "link set already resolved");
            return;
        }

        info!(worker = self.id, set_id, pending = pending.len(), "Verifying link set");

        let mut tasks = JoinSet::new();
        for url in pending {
            tasks.spawn(verify_link(
                self.repository.clone(),
                self.probe.clone(),
                set_id,
                url,
            ));
        }

        let completed = tokio::select! {
            biased;
            _ = drain(&mut tasks) => true,
            _ = self.abandon_signal() => false,
        };

        if completed {
            metrics::counter!("link_sets_processed_total").increment(1);
        } else {
            warn!(
                worker = self.id,
                set_id,
                in_flight = tasks.len(),
                "stop grace elapsed, abandoning in-flight probes"
            );
            tasks.abort_all();
        }
    }

    /// Resolves once stopped and the stop grace has elapsed.
    async fn abandon_signal(&self) {
        self.shutdown.cancelled().await;
        match self.stop_grace {
            Some(grace) => tokio::time::sleep(grace).await,
            None => std::future::pending::<()>().await,
        }
    }
}

async fn drain(tasks: &mut JoinSet<()>) {
    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined
            && e.is_panic()
        {
            error!(error = %e, "link verification task panicked");
        }
    }
}

async fn verify_link<R: LinkSetRepository + 'static>(
    repository: Arc<R>,
    probe: Arc<dyn LinkProbe>,
    set_id: i64,
    url: String,
) {
    if let Err(e) = repository
        .update_link_result(set_id, &url, LinkResult::processing(&url))
        .await
    {
        warn!(set_id, url = %url, error = %e, "failed to mark link as processing");
    }

    // Failures are logged inside; the link stays unresolved for the next trigger.
    let _ = probe_and_record(repository.as_ref(), probe.as_ref(), set_id, &url).await;
}
