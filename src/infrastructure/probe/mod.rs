//! Link probe implementations.
//!
//! - [`HttpProbe`] - HEAD/GET probing with `www.` fallback for bare domains

mod http_probe;

pub use http_probe::{DEFAULT_USER_AGENT, HttpProbe, ProbeSettings};
