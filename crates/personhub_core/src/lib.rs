//! Core domain logic for PersonHub.
//! This crate is the single source of truth for person business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{DbError, DbPool};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::person::{Person, PersonFilter, PersonId, PersonValidationError};
pub use repo::person_repo::{PersonRepository, RepoError, RepoResult, SqlitePersonRepository};
pub use service::person_service::{
    PersonListQuery, PersonPage, PersonService, ServiceError, ServiceResult, DEFAULT_LIMIT,
    DEFAULT_PAGE,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
