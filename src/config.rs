//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Example
//!
//! ```bash
//! export DATA_DIR="/var/lib/link-checker"
//! export LISTEN="127.0.0.1:8080"
//! export WORKER_COUNT="8"
//! ```
//!
//! ## Optional Variables
//!
//! - `DATA_DIR` - Directory holding `meta.json` and `sets/` (default: `./data`)
//! - `LISTEN` - Bind address (default: `0.0.0.0:8080`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `WORKER_COUNT` - Background verification workers (default: 5, 1..=256)
//! - `JOB_QUEUE_CAPACITY` - Pending set ids buffered in memory (default: 1000)
//! - `PROBE_CONNECT_TIMEOUT` / `PROBE_REQUEST_TIMEOUT` - Probe timeouts in seconds (default: 3 / 8)
//! - `PROBE_USER_AGENT` - User-Agent header sent by the probe
//! - `SHUTDOWN_TIMEOUT` - Seconds to wait for in-flight requests (default: 10)
//! - `WORKER_STOP_GRACE` - Seconds a worker may keep probing after stop (default: unlimited)
//! - `MAX_LINKS_PER_SET` - Upper bound on links in one submission (default: 1000)

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::job_manager::WorkerPoolConfig;
use crate::infrastructure::probe::{DEFAULT_USER_AGENT, ProbeSettings};

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    pub worker_count: usize,
    pub job_queue_capacity: usize,
    /// Seconds allowed for TCP connect and TLS handshake per probe request.
    pub probe_connect_timeout: u64,
    /// Seconds allowed for one whole probe request.
    pub probe_request_timeout: u64,
    pub probe_user_agent: String,
    /// Seconds the HTTP server waits for in-flight requests on shutdown.
    pub shutdown_timeout: u64,
    /// Seconds a worker may keep probing its current set after stop.
    /// `None` lets the set finish.
    pub worker_stop_grace: Option<u64>,
    pub max_links_per_set: usize,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string());
        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
        let probe_user_agent =
            env::var("PROBE_USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());

        Ok(Self {
            data_dir: PathBuf::from(data_dir),
            listen_addr,
            log_level,
            log_format,
            worker_count: parse_var("WORKER_COUNT")?.unwrap_or(5),
            job_queue_capacity: parse_var("JOB_QUEUE_CAPACITY")?.unwrap_or(1000),
            probe_connect_timeout: parse_var("PROBE_CONNECT_TIMEOUT")?.unwrap_or(3),
            probe_request_timeout: parse_var("PROBE_REQUEST_TIMEOUT")?.unwrap_or(8),
            probe_user_agent,
            shutdown_timeout: parse_var("SHUTDOWN_TIMEOUT")?.unwrap_or(10),
            worker_stop_grace: parse_var("WORKER_STOP_GRACE")?,
            max_links_per_set: parse_var("MAX_LINKS_PER_SET")?.unwrap_or(1000),
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `data_dir` is empty
    /// - `worker_count` is outside 1..=256
    /// - `job_queue_capacity` is outside 1..=1000000
    /// - a probe timeout is zero, or the request timeout is below the connect timeout
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    pub fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            anyhow::bail!("DATA_DIR must not be empty");
        }

        if self.worker_count == 0 || self.worker_count > 256 {
            anyhow::bail!(
                "WORKER_COUNT must be between 1 and 256, got {}",
                self.worker_count
            );
        }

        if self.job_queue_capacity == 0 {
            anyhow::bail!("JOB_QUEUE_CAPACITY must be at least 1");
        }

        if self.job_queue_capacity > 1_000_000 {
            anyhow::bail!(
                "JOB_QUEUE_CAPACITY is too large (max: 1000000), got {}",
                self.job_queue_capacity
            );
        }

        if self.probe_connect_timeout == 0 {
            anyhow::bail!("PROBE_CONNECT_TIMEOUT must be greater than 0");
        }

        if self.probe_request_timeout < self.probe_connect_timeout {
            anyhow::bail!(
                "PROBE_REQUEST_TIMEOUT ({}) must not be shorter than PROBE_CONNECT_TIMEOUT ({})",
                self.probe_request_timeout,
                self.probe_connect_timeout
            );
        }

        if self.probe_user_agent.trim().is_empty() {
            anyhow::bail!("PROBE_USER_AGENT must not be empty");
        }

        if self.shutdown_timeout == 0 {
            anyhow::bail!("SHUTDOWN_TIMEOUT must be greater than 0");
        }

        if self.max_links_per_set == 0 {
            anyhow::bail!("MAX_LINKS_PER_SET must be at least 1");
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        Ok(())
    }

    pub fn worker_pool(&self) -> WorkerPoolConfig {
        WorkerPoolConfig {
            workers: self.worker_count,
            queue_capacity: self.job_queue_capacity,
            stop_grace: self.worker_stop_grace.map(Duration::from_secs),
        }
    }

    pub fn probe_settings(&self) -> ProbeSettings {
        ProbeSettings {
            connect_timeout: Duration::from_secs(self.probe_connect_timeout),
            request_timeout: Duration::from_secs(self.probe_request_timeout),
            user_agent: self.probe_user_agent.clone(),
        }
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }

    /// Prints configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Data directory: {}", self.data_dir.display());
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!(
            "  Workers: {} (queue capacity {})",
            self.worker_count,
            self.job_queue_capacity
        );
        tracing::info!(
            "  Probe timeouts: connect {}s, request {}s",
            self.probe_connect_timeout,
            self.probe_request_timeout
        );
        match self.worker_stop_grace {
            Some(grace) => tracing::info!("  Worker stop grace: {}s", grace),
            None => tracing::info!("  Worker stop grace: until set completes"),
        }
        tracing::info!("  Max links per set: {}", self.max_links_per_set);
    }
}

/// Reads an optional variable and parses it.
///
/// An unset or blank variable yields `None`; a present but malformed one is an error.
fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{name} has an invalid value '{raw}'")),
        _ => Ok(None),
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable is malformed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
