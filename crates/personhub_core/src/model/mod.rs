//! Domain model for the person resource.
//!
//! # Responsibility
//! - Define the canonical record shared by repository, service and HTTP layers.
//! - Own field-level validation rules.
//!
//! # Invariants
//! - `id` is assigned by storage and never changes after creation.
//! - Deletion is physical; there is no tombstone state.

pub mod person;
