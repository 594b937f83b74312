//! HTTP surface for the person service.
//!
//! # Responsibility
//! - Expose person CRUD over JSON/HTTP with axum.
//! - Map domain errors to status codes in one place (`ApiError`).
//!
//! # Invariants
//! - Handlers hold no mutable state; concurrency safety comes from the
//!   store's connection pool.
//! - Blocking store calls run on Tokio's blocking pool.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiResult, ErrorBody};
pub use handlers::{HealthResponse, ListResponse};
pub use router::{build_router, person_routes};
pub use server::serve;
pub use state::AppState;
