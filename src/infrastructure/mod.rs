//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for storage, probing and report output.
//!
//! # Modules
//!
//! - [`persistence`] - File-backed link set store with atomic writes
//! - [`probe`] - HTTP reachability probe
//! - [`report`] - PDF rendering of link sets

pub mod persistence;
pub mod probe;
pub mod report;
