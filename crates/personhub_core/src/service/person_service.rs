//! Person use-case service.
//!
//! # Responsibility
//! - Enforce validation, existence and email-uniqueness rules.
//! - Default and translate pagination into repository limit/offset.
//! - Translate repository absence into `ServiceError::NotFound`.
//!
//! # Invariants
//! - Invalid input never reaches the repository.
//! - The email check here is a fast path only; the repository's unique
//!   constraint decides races between concurrent writers.
//! - The service holds no persisted state of its own.

use crate::model::person::{Person, PersonFilter, PersonId, PersonValidationError};
use crate::repo::person_repo::{PersonRepository, RepoError};
use log::{error, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Page used when the caller leaves `page` unset or zero.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when the caller leaves `limit` unset or zero.
pub const DEFAULT_LIMIT: u32 = 10;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Domain error surfaced to callers of `PersonService`.
///
/// `Display` text is the public, client-facing message.
#[derive(Debug)]
pub enum ServiceError {
    NotFound,
    Conflict,
    BadParamInput(PersonValidationError),
    Internal(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "your requested item is not found"),
            Self::Conflict => write!(f, "your email already exist, must be unique"),
            Self::BadParamInput(_) => write!(f, "given param is not valid"),
            Self::Internal(_) => write!(f, "internal Server Error"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::BadParamInput(err) => Some(err),
            Self::Internal(err) => Some(err),
            Self::NotFound | Self::Conflict => None,
        }
    }
}

impl From<PersonValidationError> for ServiceError {
    fn from(value: PersonValidationError) -> Self {
        Self::BadParamInput(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(_) => Self::NotFound,
            RepoError::Conflict => Self::Conflict,
            RepoError::Validation(err) => Self::BadParamInput(err),
            other => Self::Internal(other),
        }
    }
}

/// List request: filter plus 1-based page and page size.
///
/// Zero `page`/`limit` mean "use the default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonListQuery {
    pub filter: PersonFilter,
    pub page: u32,
    pub limit: u32,
}

/// One page of list results with the effective paging values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonPage {
    pub persons: Vec<Person>,
    /// Rows matching the filter, ignoring pagination.
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl PersonPage {
    /// `ceil(total / limit)`; zero when nothing matches.
    pub fn last_page(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.limit))
    }
}

/// Use-case service for person CRUD.
pub struct PersonService<R: PersonRepository> {
    repo: R,
}

impl<R: PersonRepository> PersonService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Lists one page of persons matching the filter.
    ///
    /// # Contract
    /// - `page == 0` → 1, `limit == 0` → 10.
    /// - `offset = (page - 1) * limit`.
    /// - `total` is counted with the same filter as the page.
    pub fn list(&self, query: &PersonListQuery) -> ServiceResult<PersonPage> {
        let page = if query.page == 0 { DEFAULT_PAGE } else { query.page };
        let limit = if query.limit == 0 { DEFAULT_LIMIT } else { query.limit };
        let offset = u64::from(page - 1) * u64::from(limit);

        let persons = self
            .repo
            .list_all(&query.filter, limit, offset)
            .map_err(|err| internal("list", err))?;
        let total = self
            .repo
            .count(&query.filter)
            .map_err(|err| internal("count", err))?;

        Ok(PersonPage {
            persons,
            total,
            page,
            limit,
        })
    }

    /// Gets one person by id.
    ///
    /// Returns `NotFound` for `id <= 0` and for ids with no row.
    pub fn get_one(&self, id: PersonId) -> ServiceResult<Person> {
        if id <= 0 {
            return Err(ServiceError::NotFound);
        }

        match self.repo.get_by_id(id) {
            Ok(Some(person)) => Ok(person),
            Ok(None) => Err(ServiceError::NotFound),
            Err(err) => Err(internal("get_one", err)),
        }
    }

    /// Creates a person after validation and the email-uniqueness check.
    pub fn create(&self, person: &Person) -> ServiceResult<Person> {
        validate(person)?;
        self.ensure_email_available(&person.email, None)?;

        let mut unsaved = person.clone();
        unsaved.id = 0;
        self.repo.create(&unsaved).map_err(|err| write_error("create", err))
    }

    /// Overwrites an existing person's fields, keeping its id.
    ///
    /// # Contract
    /// - `NotFound` for `id <= 0` or a missing row.
    /// - Keeping the record's own email is not a conflict.
    pub fn update(&self, id: PersonId, person: &Person) -> ServiceResult<Person> {
        if id <= 0 {
            return Err(ServiceError::NotFound);
        }
        validate(person)?;
        self.get_one(id)?;
        self.ensure_email_available(&person.email, Some(id))?;

        self.repo
            .update(id, person)
            .map_err(|err| write_error("update", err))
    }

    /// Deletes a person by id.
    pub fn delete(&self, id: PersonId) -> ServiceResult<()> {
        if id <= 0 {
            return Err(ServiceError::NotFound);
        }

        self.repo.delete(id).map_err(|err| write_error("delete", err))
    }

    fn ensure_email_available(&self, email: &str, owner: Option<PersonId>) -> ServiceResult<()> {
        match self.repo.get_by_email(email) {
            Ok(Some(existing)) if Some(existing.id) != owner => Err(ServiceError::Conflict),
            Ok(_) => Ok(()),
            Err(err) => Err(internal("email_check", err)),
        }
    }
}

fn validate(person: &Person) -> ServiceResult<()> {
    person.validate().map_err(|err| {
        warn!(
            "event=person_validate module=service status=rejected field={} reason=\"{}\"",
            err.field(),
            err
        );
        ServiceError::BadParamInput(err)
    })
}

fn write_error(op: &str, err: RepoError) -> ServiceError {
    match err {
        RepoError::NotFound(_) | RepoError::Conflict | RepoError::Validation(_) => err.into(),
        other => internal(op, other),
    }
}

fn internal(op: &str, err: RepoError) -> ServiceError {
    error!("event=person_{op} module=service status=error error={err}");
    ServiceError::Internal(err)
}
