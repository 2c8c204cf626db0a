//! Durable storage implementations.
//!
//! # Repositories
//!
//! - [`FileSetRepository`] - Link sets as JSON files on a single node
//!
//! # Helpers
//!
//! - [`atomic_file`] - Write-to-temp-then-rename commit protocol

pub mod atomic_file;
pub mod file_set_repository;

pub use file_set_repository::FileSetRepository;
