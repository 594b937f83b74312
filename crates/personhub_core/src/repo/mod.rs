//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Lookups report absence as `Ok(None)`, never as an error.
//! - Writes that touch zero rows return `RepoError::NotFound`.
//! - The `persons.email` unique constraint is the final authority on
//!   uniqueness and surfaces as `RepoError::Conflict`.

pub mod person_repo;
