//! Repository trait definitions for the domain layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod link_set_repository;

pub use link_set_repository::{LinkSetRepository, StoreError};

#[cfg(test)]
pub use link_set_repository::MockLinkSetRepository;
