//! Network implementation of the link probe.

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use std::error::Error as _;
use std::time::Duration;
use tracing::debug;

use crate::domain::probe::{LinkProbe, ProbeOutcome};
use crate::utils::url_normalizer::candidate_urls;

/// User-Agent sent with every probe; some sites reject unknown clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Timeouts and identification used by [`HttpProbe`].
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    /// TCP connect and TLS handshake budget.
    pub connect_timeout: Duration,
    /// Budget for one whole request.
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(3),
            request_timeout: Duration::from_secs(8),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Why a single request did not count as success.
#[derive(Debug, Clone, PartialEq, Eq)]
enum AttemptFailure {
    Status(StatusCode),
    UnresolvedName,
    Transport(String),
}

impl AttemptFailure {
    fn describe(&self) -> String {
        match self {
            Self::Status(status) => format!("HTTP {}", status.as_u16()),
            Self::UnresolvedName => "host not found".to_string(),
            Self::Transport(reason) => reason.clone(),
        }
    }
}

/// Probes links over HTTP.
///
/// For every candidate URL (see [`candidate_urls`]) a `HEAD` request is
/// tried first and a `GET` second; any status in `200..400` is a success and
/// the first successful candidate wins. A name-resolution failure skips the
/// rest of the attempts for that candidate.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    /// Builds the probe and its HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(settings: &ProbeSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .user_agent(settings.user_agent.clone())
            .build()?;

        Ok(Self { client })
    }

    async fn attempt(&self, method: Method, url: &str) -> Result<(), AttemptFailure> {
        match self.client.request(method, url).send().await {
            Ok(response) if is_acceptable(response.status()) => Ok(()),
            Ok(response) => Err(AttemptFailure::Status(response.status())),
            Err(e) if is_unresolved_name(&e) => Err(AttemptFailure::UnresolvedName),
            Err(e) => Err(AttemptFailure::Transport(transport_reason(&e))),
        }
    }
}

#[async_trait]
impl LinkProbe for HttpProbe {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        let mut last_failure = None;

        for candidate in candidate_urls(url) {
            for method in [Method::HEAD, Method::GET] {
                match self.attempt(method.clone(), &candidate).await {
                    Ok(()) => {
                        debug!(url, candidate = %candidate, %method, "link reachable");
                        return ProbeOutcome::reachable("ok");
                    }
                    Err(failure) => {
                        debug!(url, candidate = %candidate, %method, reason = %failure.describe(), "probe attempt failed");
                        let unresolved = failure == AttemptFailure::UnresolvedName;
                        last_failure = Some(failure);
                        if unresolved {
                            break;
                        }
                    }
                }
            }
        }

        match last_failure {
            Some(failure) => ProbeOutcome::unreachable(format!("unreachable: {}", failure.describe())),
            None => ProbeOutcome::unreachable("unreachable"),
        }
    }
}

fn is_acceptable(status: StatusCode) -> bool {
    (200..400).contains(&status.as_u16())
}

/// Walks the error chain looking for a DNS resolution failure.
fn is_unresolved_name(error: &reqwest::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(error);
    while let Some(err) = source {
        let text = err.to_string().to_ascii_lowercase();
        if text.contains("dns error")
            || text.contains("no such host")
            || text.contains("failed to lookup address")
            || text.contains("name or service not known")
        {
            return true;
        }
        source = err.source();
    }
    false
}

fn transport_reason(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "timed out".to_string()
    } else if error.is_connect() {
        "connection failed".to_string()
    } else if error.is_redirect() {
        "too many redirects".to_string()
    } else {
        error
            .source()
            .map(|s| s.to_string())
            .unwrap_or_else(|| error.to_string())
    }
}
