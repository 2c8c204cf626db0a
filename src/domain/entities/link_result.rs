//! Per-link verification state and result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::probe::ProbeOutcome;

/// Verification state of a single link within a set.
///
/// `Available` and `NotAvailable` are terminal: once a link reaches one of
/// them it is never probed again for that set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkState {
    /// Not checked yet.
    Unknown,
    /// A worker has picked the link up and a probe is running.
    Processing,
    Available,
    NotAvailable,
}

impl LinkState {
    /// Returns true for `Available` and `NotAvailable`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Available | Self::NotAvailable)
    }

    /// Human-readable label used in API responses and reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Processing => "processing",
            Self::Available => "available",
            Self::NotAvailable => "not available",
        }
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = match self {
            Self::Unknown => "unknown",
            Self::Processing => "processing",
            Self::Available => "available",
            Self::NotAvailable => "not_available",
        };
        f.write_str(raw)
    }
}

/// Outcome of verifying one URL of a link set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkResult {
    pub url: String,
    pub state: LinkState,
    /// Set only when a probe has completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub detail: String,
}

impl LinkResult {
    /// Marker written by a worker right before it probes the link.
    pub fn processing(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            state: LinkState::Processing,
            checked_at: None,
            detail: String::new(),
        }
    }

    /// Terminal result built from a completed probe.
    pub fn from_probe(url: impl Into<String>, outcome: ProbeOutcome, checked_at: DateTime<Utc>) -> Self {
        let state = if outcome.reachable {
            LinkState::Available
        } else {
            LinkState::NotAvailable
        };

        Self {
            url: url.into(),
            state,
            checked_at: Some(checked_at),
            detail: outcome.detail,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(LinkState::Available.is_terminal());
        assert!(LinkState::NotAvailable.is_terminal());
        assert!(!LinkState::Unknown.is_terminal());
        assert!(!LinkState::Processing.is_terminal());
    }

    #[test]
    fn test_state_serialization() {
        assert_eq!(
            serde_json::to_string(&LinkState::NotAvailable).unwrap(),
            "\"not_available\""
        );
        let parsed: LinkState = serde_json::from_str("\"processing\"").unwrap();
        assert_eq!(parsed, LinkState::Processing);
    }

    #[test]
    fn test_labels() {
        assert_eq!(LinkState::Available.label(), "available");
        assert_eq!(LinkState::NotAvailable.label(), "not available");
        assert_eq!(LinkState::NotAvailable.to_string(), "not_available");
    }

    #[test]
    fn test_from_probe() {
        let now = Utc::now();
        let ok = LinkResult::from_probe("https://a.com", ProbeOutcome::reachable("ok"), now);
        assert_eq!(ok.state, LinkState::Available);
        assert_eq!(ok.checked_at, Some(now));
        assert_eq!(ok.detail, "ok");

        let failed =
            LinkResult::from_probe("https://b.com", ProbeOutcome::unreachable("unreachable"), now);
        assert_eq!(failed.state, LinkState::NotAvailable);
        assert!(failed.is_terminal());
    }

    #[test]
    fn test_processing_marker_omits_optional_fields() {
        let marker = LinkResult::processing("https://a.com");
        let json = serde_json::to_value(&marker).unwrap();

        assert_eq!(json["state"], "processing");
        assert!(json.get("checked_at").is_none());
        assert!(json.get("detail").is_none());
    }
}
