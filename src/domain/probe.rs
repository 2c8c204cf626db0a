//! Link probe capability.
//!
//! Deciding whether a URL is reachable is modelled as an injectable trait so
//! the worker pool and the submission path can run against deterministic
//! stand-ins in tests. The network implementation lives in
//! [`crate::infrastructure::probe::HttpProbe`].

use async_trait::async_trait;

/// Result of probing a single URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub reachable: bool,
    /// Short diagnostic, e.g. `"ok"` or `"unreachable: HTTP 404"`.
    pub detail: String,
}

impl ProbeOutcome {
    pub fn reachable(detail: impl Into<String>) -> Self {
        Self {
            reachable: true,
            detail: detail.into(),
        }
    }

    pub fn unreachable(detail: impl Into<String>) -> Self {
        Self {
            reachable: false,
            detail: detail.into(),
        }
    }
}

/// Decides whether a URL is reachable.
///
/// Implementations never fail: network errors are reported as an
/// unreachable outcome with a diagnostic detail.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkProbe: Send + Sync {
    async fn probe(&self, url: &str) -> ProbeOutcome;
}
