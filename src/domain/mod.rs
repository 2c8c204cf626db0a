//! Domain layer containing link set entities and verification logic.
//!
//! Nothing here knows about HTTP or the on-disk format; storage and probing
//! are reached through the [`repositories::LinkSetRepository`] and
//! [`probe::LinkProbe`] traits.
//!
//! # Architecture
//!
//! - [`entities`] - Link sets and per-link results
//! - [`repositories`] - Storage trait and its error type
//! - [`probe`] - Reachability probe trait
//! - [`verification`] - Probe one link and record the outcome
//! - [`job_manager`] - Bounded job queue and background workers
//!
//! # Verification Flow
//!
//! 1. A set is created and checked once by the submission path
//! 2. Its id is handed to [`job_manager::JobManager::enqueue`]
//! 3. A worker probes every link still without a terminal result
//! 4. On restart the manager re-queues every set that is not `done`

pub mod entities;
pub mod job_manager;
pub mod probe;
pub mod repositories;
pub mod verification;
