//! Person HTTP handlers.
//!
//! # Responsibility
//! - Parse path, query and body input into typed service calls.
//! - Shape successful results into JSON responses with the right status.
//!
//! # Invariants
//! - A non-numeric `{id}` is reported as not found, never as a parse error.
//! - Missing or unparsable `page`/`limit` fall back to service defaults.
//! - All failures go through `ApiError`.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use log::info;
use personhub_core::{
    core_version, Person, PersonFilter, PersonId, PersonListQuery, PersonPage, PersonRepository,
};
use serde::{Deserialize, Serialize};

/// Raw list query; numbers stay strings so bad input can fall back to
/// defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListParams {
    fn into_query(self) -> PersonListQuery {
        PersonListQuery {
            filter: PersonFilter::new(self.email, self.phone, self.first_name),
            page: parse_positive(self.page.as_deref()),
            limit: parse_positive(self.limit.as_deref()),
        }
    }
}

/// List response envelope.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListResponse {
    pub data: Vec<Person>,
    pub total: u64,
    pub page: u32,
    pub last_page: u64,
}

impl From<PersonPage> for ListResponse {
    fn from(page: PersonPage) -> Self {
        let last_page = page.last_page();
        Self {
            data: page.persons,
            total: page.total,
            page: page.page,
            last_page,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: core_version().to_string(),
    })
}

/// `GET /person`
pub async fn list_persons<R: PersonRepository + 'static>(
    State(state): State<AppState<R>>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<ListResponse>> {
    let query = params.into_query();
    let page = state.run(move |service| service.list(&query)).await?;
    info!(
        "event=person_list module=http status=ok returned={} total={} page={}",
        page.persons.len(),
        page.total,
        page.page
    );
    Ok(Json(ListResponse::from(page)))
}

/// `GET /person/{id}`
pub async fn get_person<R: PersonRepository + 'static>(
    State(state): State<AppState<R>>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Person>> {
    let id = parse_id(&raw_id)?;
    let person = state.run(move |service| service.get_one(id)).await?;
    info!("event=person_get module=http status=ok id={id}");
    Ok(Json(person))
}

/// `POST /person`
pub async fn create_person<R: PersonRepository + 'static>(
    State(state): State<AppState<R>>,
    payload: Result<Json<Person>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Person>)> {
    let person = parse_person(payload)?;
    let created = state.run(move |service| service.create(&person)).await?;
    info!("event=person_create module=http status=ok id={}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /person/{id}`
///
/// Answers 201 rather than 200 to stay wire-compatible with existing clients.
pub async fn update_person<R: PersonRepository + 'static>(
    State(state): State<AppState<R>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<Person>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Person>)> {
    let id = parse_id(&raw_id)?;
    let person = parse_person(payload)?;
    let updated = state
        .run(move |service| service.update(id, &person))
        .await?;
    info!("event=person_update module=http status=ok id={id}");
    Ok((StatusCode::CREATED, Json(updated)))
}

/// `DELETE /person/{id}`
pub async fn delete_person<R: PersonRepository + 'static>(
    State(state): State<AppState<R>>,
    Path(raw_id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&raw_id)?;
    state.run(move |service| service.delete(id)).await?;
    info!("event=person_delete module=http status=ok id={id}");
    Ok(StatusCode::NO_CONTENT)
}

fn parse_id(raw: &str) -> ApiResult<PersonId> {
    raw.trim().parse::<PersonId>().map_err(|_| ApiError::NotFound)
}

fn parse_person(payload: Result<Json<Person>, JsonRejection>) -> ApiResult<Person> {
    let Json(person) = payload?;
    person.validate()?;
    Ok(person)
}

/// Parses a paging value; anything missing, malformed or negative is 0,
/// which the service replaces with its default.
fn parse_positive(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .unwrap_or(0)
}
