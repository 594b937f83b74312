//! Route table and middleware stack.

use crate::handlers::{
    create_person, delete_person, get_person, health, list_persons, update_person,
};
use crate::middleware::log_requests;
use crate::state::AppState;
use axum::routing::get;
use axum::{middleware, Router};
use personhub_core::PersonRepository;
use tower_http::cors::{Any, CorsLayer};

/// Builds the full application router: person routes, health, CORS and
/// request logging.
pub fn build_router<R: PersonRepository + 'static>(state: AppState<R>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .merge(person_routes(state))
        .layer(middleware::from_fn(log_requests))
        .layer(cors)
}

/// Person CRUD routes.
pub fn person_routes<R: PersonRepository + 'static>(state: AppState<R>) -> Router {
    Router::new()
        .route("/person", get(list_persons::<R>).post(create_person::<R>))
        .route(
            "/person/:id",
            get(get_person::<R>)
                .put(update_person::<R>)
                .delete(delete_person::<R>),
        )
        .with_state(state)
}
