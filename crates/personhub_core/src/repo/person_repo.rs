//! Person repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide filtered, paginated listing and point lookups over `persons`.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every method checks out exactly one pooled connection and releases it
//!   before returning.
//! - Listing is ordered by `id ASC`; `count` uses the same filter as listing.
//! - Timestamps are written by SQL at write time, never by callers.

use crate::db::{DbError, DbPool};
use crate::model::person::{Person, PersonFilter, PersonId, PersonValidationError};
use rusqlite::types::Value;
use rusqlite::{ffi, params, params_from_iter, ErrorCode, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PERSON_SELECT_SQL: &str = "SELECT
    id,
    email,
    phone,
    first_name
FROM persons";

const NOW_MS_SQL: &str = "(strftime('%s', 'now') * 1000)";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for person persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(PersonValidationError),
    Db(DbError),
    NotFound(PersonId),
    /// Another row already owns the email.
    Conflict,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "person not found: {id}"),
            Self::Conflict => write!(f, "unique constraint violated on persons.email"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::Conflict => None,
        }
    }
}

impl From<PersonValidationError> for RepoError {
    fn from(value: PersonValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for person CRUD operations.
///
/// Implementations must be shareable across request tasks.
pub trait PersonRepository: Send + Sync {
    fn list_all(&self, filter: &PersonFilter, limit: u32, offset: u64) -> RepoResult<Vec<Person>>;
    fn count(&self, filter: &PersonFilter) -> RepoResult<u64>;
    fn get_by_id(&self, id: PersonId) -> RepoResult<Option<Person>>;
    fn get_by_email(&self, email: &str) -> RepoResult<Option<Person>>;
    fn create(&self, person: &Person) -> RepoResult<Person>;
    fn update(&self, id: PersonId, person: &Person) -> RepoResult<Person>;
    fn delete(&self, id: PersonId) -> RepoResult<()>;
}

/// SQLite-backed person repository over a connection pool.
#[derive(Clone)]
pub struct SqlitePersonRepository {
    pool: DbPool,
}

impl SqlitePersonRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl PersonRepository for SqlitePersonRepository {
    fn list_all(&self, filter: &PersonFilter, limit: u32, offset: u64) -> RepoResult<Vec<Person>> {
        let (where_sql, mut bind_values) = filter_clause(filter);
        let sql = format!("{PERSON_SELECT_SQL}{where_sql} ORDER BY id ASC LIMIT ? OFFSET ?");
        bind_values.push(Value::Integer(i64::from(limit)));
        bind_values.push(Value::Integer(offset_to_sql(offset)));

        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut persons = Vec::new();

        while let Some(row) = rows.next()? {
            persons.push(parse_person_row(row)?);
        }

        Ok(persons)
    }

    fn count(&self, filter: &PersonFilter) -> RepoResult<u64> {
        let (where_sql, bind_values) = filter_clause(filter);
        let sql = format!("SELECT COUNT(id) FROM persons{where_sql}");

        let conn = self.pool.get()?;
        let count: i64 =
            conn.query_row(&sql, params_from_iter(bind_values), |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    fn get_by_id(&self, id: PersonId) -> RepoResult<Option<Person>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!("{PERSON_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_person_row(row)?));
        }

        Ok(None)
    }

    fn get_by_email(&self, email: &str) -> RepoResult<Option<Person>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!("{PERSON_SELECT_SQL} WHERE email = ?1;"))?;
        let mut rows = stmt.query([email])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_person_row(row)?));
        }

        Ok(None)
    }

    fn create(&self, person: &Person) -> RepoResult<Person> {
        person.validate()?;

        let conn = self.pool.get()?;
        let id: PersonId = conn
            .query_row(
                &format!(
                    "INSERT INTO persons (email, phone, first_name, created_at)
                     VALUES (?1, ?2, ?3, {NOW_MS_SQL})
                     RETURNING id;"
                ),
                params![
                    person.email.as_str(),
                    person.phone.as_str(),
                    person.first_name.as_str(),
                ],
                |row| row.get(0),
            )
            .map_err(map_write_error)?;

        Ok(person.clone().with_id(id))
    }

    fn update(&self, id: PersonId, person: &Person) -> RepoResult<Person> {
        person.validate()?;

        let conn = self.pool.get()?;
        let updated = conn
            .query_row(
                &format!(
                    "UPDATE persons
                     SET
                        email = ?1,
                        phone = ?2,
                        first_name = ?3,
                        updated_at = {NOW_MS_SQL}
                     WHERE id = ?4
                     RETURNING id, email, phone, first_name;"
                ),
                params![
                    person.email.as_str(),
                    person.phone.as_str(),
                    person.first_name.as_str(),
                    id,
                ],
                parse_person_row_sqlite,
            )
            .optional()
            .map_err(map_write_error)?;

        updated.ok_or(RepoError::NotFound(id))
    }

    fn delete(&self, id: PersonId) -> RepoResult<()> {
        let conn = self.pool.get()?;
        let changed = conn.execute("DELETE FROM persons WHERE id = ?1;", [id])?;

        if changed != 1 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

/// Builds the `WHERE` clause for a filter.
///
/// Every supplied field matches as a substring, with LIKE wildcards in the
/// input escaped. Exact email lookup is `get_by_email`.
fn filter_clause(filter: &PersonFilter) -> (String, Vec<Value>) {
    let mut sql = String::from(" WHERE 1 = 1");
    let mut bind_values: Vec<Value> = Vec::new();

    if let Some(email) = filter.email.as_ref() {
        sql.push_str(" AND email LIKE ? ESCAPE '\\'");
        bind_values.push(Value::Text(contains_pattern(email)));
    }

    if let Some(phone) = filter.phone.as_ref() {
        sql.push_str(" AND phone LIKE ? ESCAPE '\\'");
        bind_values.push(Value::Text(contains_pattern(phone)));
    }

    if let Some(first_name) = filter.first_name.as_ref() {
        sql.push_str(" AND first_name LIKE ? ESCAPE '\\'");
        bind_values.push(Value::Text(contains_pattern(first_name)));
    }

    (sql, bind_values)
}

fn contains_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn offset_to_sql(offset: u64) -> i64 {
    i64::try_from(offset).unwrap_or(i64::MAX)
}

fn map_write_error(err: rusqlite::Error) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(code, _)
            if code.code == ErrorCode::ConstraintViolation
                && code.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            RepoError::Conflict
        }
        _ => err.into(),
    }
}

fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    Ok(parse_person_row_sqlite(row)?)
}

fn parse_person_row_sqlite(row: &Row<'_>) -> rusqlite::Result<Person> {
    Ok(Person {
        id: row.get("id")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        first_name: row.get("first_name")?,
    })
}

#[cfg(test)]
mod tests {
    use super::{contains_pattern, filter_clause};
    use crate::model::person::PersonFilter;

    #[test]
    fn contains_pattern_escapes_like_wildcards() {
        assert_eq!(contains_pattern("50%_a\\b"), "%50\\%\\_a\\\\b%");
        assert_eq!(contains_pattern("ann"), "%ann%");
    }

    #[test]
    fn filter_clause_binds_only_supplied_fields() {
        let (sql, binds) = filter_clause(&PersonFilter::default());
        assert_eq!(sql, " WHERE 1 = 1");
        assert!(binds.is_empty());

        let filter = PersonFilter::new(Some("a@b.c".into()), None, Some("an".into()));
        let (sql, binds) = filter_clause(&filter);
        assert!(sql.contains("email LIKE ?"));
        assert!(!sql.contains("phone"));
        assert!(sql.contains("first_name LIKE ?"));
        assert_eq!(binds.len(), 2);
    }
}
