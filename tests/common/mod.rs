//! Shared test utilities for den integration tests
//!
//! Real git repositories through the git CLI, config fixtures, host API
//! payloads and output predicates.

pub mod assertions;
pub mod fixtures;
pub mod repository;
