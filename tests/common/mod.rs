#![allow(dead_code)]

use async_trait::async_trait;
use link_checker::application::services::{LinkService, ReportService};
use link_checker::domain::entities::LinkResult;
use link_checker::domain::job_manager::{JobManager, WorkerPoolConfig};
use link_checker::domain::probe::{LinkProbe, ProbeOutcome};
use link_checker::domain::repositories::LinkSetRepository;
use link_checker::infrastructure::persistence::FileSetRepository;
use link_checker::state::AppState;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Deterministic probe: per-URL outcome and delay, unknown URLs are unreachable.
#[derive(Default)]
pub struct StubProbe {
    reachable: HashMap<String, bool>,
    delays: HashMap<String, Duration>,
    calls: Mutex<HashMap<String, usize>>,
}

impl StubProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reachable(mut self, url: &str) -> Self {
        self.reachable.insert(url.to_string(), true);
        self
    }

    pub fn unreachable(mut self, url: &str) -> Self {
        self.reachable.insert(url.to_string(), false);
        self
    }

    pub fn delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    /// Number of probes started for `url`.
    pub fn calls_for(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl LinkProbe for StubProbe {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        *self.calls.lock().unwrap().entry(url.to_string()).or_default() += 1;

        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }

        if self.reachable.get(url).copied().unwrap_or(false) {
            ProbeOutcome::reachable("ok")
        } else {
            ProbeOutcome::unreachable("unreachable")
        }
    }
}

/// Everything a handler test needs; the data directory lives as long as this value.
pub struct TestContext {
    pub state: AppState,
    pub repository: Arc<FileSetRepository>,
    pub probe: Arc<StubProbe>,
    pub dir: TempDir,
}

pub async fn open_repository(dir: &TempDir) -> Arc<FileSetRepository> {
    Arc::new(FileSetRepository::open(dir.path()).await.unwrap())
}

pub fn pool_config(workers: usize, stop_grace: Option<Duration>) -> WorkerPoolConfig {
    WorkerPoolConfig {
        workers,
        queue_capacity: 100,
        stop_grace,
    }
}

/// Builds application state over a fresh data directory.
///
/// The job manager is created but its workers are not started, so handler
/// tests only observe the immediate check.
pub async fn create_test_state(probe: StubProbe) -> TestContext {
    let dir = TempDir::new().unwrap();
    let repository = open_repository(&dir).await;
    let probe = Arc::new(probe);
    let dyn_probe: Arc<dyn LinkProbe> = probe.clone();

    let job_manager = Arc::new(
        JobManager::new(repository.clone(), dyn_probe.clone(), pool_config(1, None))
            .await
            .unwrap(),
    );

    let state = AppState {
        link_service: Arc::new(LinkService::new(repository.clone(), dyn_probe, 100)),
        report_service: Arc::new(ReportService::new(repository.clone())),
        job_manager,
    };

    TestContext {
        state,
        repository,
        probe,
        dir,
    }
}

/// Stores a set and resolves the given links directly through the repository.
pub async fn create_test_set(
    repository: &FileSetRepository,
    links: &[&str],
    resolved: &[(&str, bool)],
) -> i64 {
    let set = repository
        .create_set(links.iter().map(|l| l.to_string()).collect())
        .await
        .unwrap();

    for (url, reachable) in resolved {
        let outcome = if *reachable {
            ProbeOutcome::reachable("ok")
        } else {
            ProbeOutcome::unreachable("unreachable")
        };
        repository
            .update_link_result(set.id, url, LinkResult::from_probe(*url, outcome, chrono::Utc::now()))
            .await
            .unwrap();
    }

    set.id
}

/// Polls `check` until it returns true or `timeout` elapses.
pub async fn wait_until<F, Fut>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check().await
}
