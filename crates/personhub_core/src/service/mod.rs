//! Core use-case services.
//!
//! # Responsibility
//! - Apply business rules (validation, existence, email uniqueness,
//!   pagination defaults) before delegating to repositories.
//! - Keep the HTTP layer decoupled from storage details.

pub mod person_service;
