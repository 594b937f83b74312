//! Person domain model.
//!
//! # Responsibility
//! - Define the canonical `Person` record and its list filter.
//! - Provide field validation used before any write.
//!
//! # Invariants
//! - `id == 0` only for records that were never persisted.
//! - `email` is unique across persisted persons (enforced by storage).
//! - `first_name` length is counted in characters, not bytes.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned person identifier.
pub type PersonId = i64;

/// Minimum accepted `first_name` length in characters.
pub const FIRST_NAME_MIN_CHARS: usize = 3;
/// Maximum accepted `first_name` length in characters.
pub const FIRST_NAME_MAX_CHARS: usize = 50;

/// Canonical person record.
///
/// Serialized field names match the public JSON shape
/// (`id`, `email`, `phone`, `first_name`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Zero until storage assigns an id on insert.
    #[serde(default)]
    pub id: PersonId,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub first_name: String,
}

impl Person {
    /// Creates an unsaved person (`id == 0`).
    pub fn new(
        email: impl Into<String>,
        phone: impl Into<String>,
        first_name: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            email: email.into(),
            phone: phone.into(),
            first_name: first_name.into(),
        }
    }

    /// Returns a copy carrying the given storage id.
    pub fn with_id(mut self, id: PersonId) -> Self {
        self.id = id;
        self
    }

    /// Checks required fields and length constraints.
    ///
    /// # Errors
    /// - `EmptyEmail` / `EmptyPhone` when the field is the empty string.
    ///   Whitespace counts as a value.
    /// - `FirstNameLength` when `first_name` is outside 3..=50 characters.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        if self.email.is_empty() {
            return Err(PersonValidationError::EmptyEmail);
        }
        if self.phone.is_empty() {
            return Err(PersonValidationError::EmptyPhone);
        }

        let len = self.first_name.chars().count();
        if !(FIRST_NAME_MIN_CHARS..=FIRST_NAME_MAX_CHARS).contains(&len) {
            return Err(PersonValidationError::FirstNameLength { len });
        }

        Ok(())
    }
}

/// Field validation failure for a `Person` write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonValidationError {
    EmptyEmail,
    EmptyPhone,
    FirstNameLength { len: usize },
}

impl PersonValidationError {
    /// Stable field name, safe to log (never carries user data).
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyEmail => "email",
            Self::EmptyPhone => "phone",
            Self::FirstNameLength { .. } => "first_name",
        }
    }
}

impl Display for PersonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email is required"),
            Self::EmptyPhone => write!(f, "phone is required"),
            Self::FirstNameLength { len } => write!(
                f,
                "first_name must be {FIRST_NAME_MIN_CHARS}..={FIRST_NAME_MAX_CHARS} characters, got {len}"
            ),
        }
    }
}

impl Error for PersonValidationError {}

/// Optional list filter. Blank values count as "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonFilter {
    /// Substring match on email.
    pub email: Option<String>,
    /// Substring match on phone.
    pub phone: Option<String>,
    /// Substring match on first name.
    pub first_name: Option<String>,
}

impl PersonFilter {
    /// Builds a filter, dropping blank values.
    pub fn new(
        email: Option<String>,
        phone: Option<String>,
        first_name: Option<String>,
    ) -> Self {
        Self {
            email: non_blank(email),
            phone: non_blank(phone),
            first_name: non_blank(first_name),
        }
    }

    /// Filter on email alone.
    pub fn by_email(email: impl Into<String>) -> Self {
        Self::new(Some(email.into()), None, None)
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.phone.is_none() && self.first_name.is_none()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::{Person, PersonFilter, PersonValidationError};

    #[test]
    fn validate_accepts_boundary_lengths() {
        assert!(Person::new("a@b.c", "8999", "abc").validate().is_ok());
        assert!(Person::new("a@b.c", "8999", "x".repeat(50))
            .validate()
            .is_ok());
    }

    #[test]
    fn validate_accepts_whitespace_only_email_and_phone() {
        assert!(Person::new(" ", "\t", "test").validate().is_ok());
    }

    #[test]
    fn validate_counts_characters_not_bytes() {
        // three characters, six bytes
        assert!(Person::new("a@b.c", "8999", "Юля").validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_and_out_of_range_fields() {
        assert_eq!(
            Person::new("", "8999", "test").validate(),
            Err(PersonValidationError::EmptyEmail)
        );
        assert_eq!(
            Person::new("a@b.c", "", "test").validate(),
            Err(PersonValidationError::EmptyPhone)
        );
        assert_eq!(
            Person::new("a@b.c", "8999", "ab").validate(),
            Err(PersonValidationError::FirstNameLength { len: 2 })
        );
        assert_eq!(
            Person::new("a@b.c", "8999", "x".repeat(51)).validate(),
            Err(PersonValidationError::FirstNameLength { len: 51 })
        );
    }

    #[test]
    fn person_json_uses_snake_case_shape_and_defaults_id() {
        let person: Person =
            serde_json::from_str(r#"{"email":"a@b.c","phone":"1","first_name":"Ann"}"#).unwrap();
        assert_eq!(person.id, 0);
        assert_eq!(person.first_name, "Ann");

        let value = serde_json::to_value(person.with_id(7)).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["first_name"], "Ann");
    }

    #[test]
    fn filter_drops_blank_values() {
        let filter = PersonFilter::new(Some(String::new()), Some("  ".into()), None);
        assert!(filter.is_empty());
        assert!(!PersonFilter::by_email("a@b.c").is_empty());
    }
}
