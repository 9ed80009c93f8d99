//! Parsing and validation of wire-level arguments.
//!
//! Identifiers, statuses and dates arrive as strings. Everything here
//! runs before any store access.

use chrono::{DateTime, NaiveDate, Utc};
use orgtrack_core::EntityKind;
use orgtrack_core::models::status::{ProjectStatus, TaskStatus};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::error::InputError;

/// Reject empty or whitespace-only values of a required field.
pub fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str, InputError> {
    if value.trim().is_empty() {
        return Err(InputError::MissingField { field });
    }
    Ok(value)
}

/// Required text with an upper bound on its length in characters.
pub fn bounded(field: &'static str, value: &str, max: usize) -> Result<String, InputError> {
    let value = require(field, value)?;
    if value.chars().count() > max {
        return Err(InputError::TooLong { field, max });
    }
    Ok(value.to_string())
}

/// Parse a wire id for an entity of the given kind.
pub fn parse_id(kind: EntityKind, raw: &str) -> Result<Uuid, InputError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(InputError::MissingField {
            field: id_field(kind),
        });
    }
    Uuid::parse_str(raw).map_err(|_| InputError::MalformedId {
        entity: kind,
        raw: raw.to_string(),
    })
}

fn id_field(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Organization => "organization_id",
        EntityKind::Project => "project_id",
        EntityKind::Task => "task_id",
        EntityKind::Comment => "comment_id",
    }
}

pub fn project_status(raw: &str) -> Result<ProjectStatus, InputError> {
    Ok(raw.trim().parse()?)
}

pub fn task_status(raw: &str) -> Result<TaskStatus, InputError> {
    Ok(raw.trim().parse()?)
}

/// Minimal `local@domain.tld` shape check.
pub fn email(field: &'static str, value: &str) -> Result<String, InputError> {
    let value = require(field, value)?.trim();
    let invalid = || InputError::InvalidEmail {
        field,
        value: value.to_string(),
    };

    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    let well_formed = !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.chars().any(char::is_whitespace);
    if !well_formed {
        return Err(invalid());
    }
    Ok(value.to_string())
}

/// Like [`email`], but an empty value is allowed and means "none".
pub fn optional_email(field: &'static str, value: &str) -> Result<String, InputError> {
    if value.trim().is_empty() {
        return Ok(String::new());
    }
    email(field, value)
}

/// Calendar date in `YYYY-MM-DD` form.
pub fn date(field: &'static str, raw: &str) -> Result<NaiveDate, InputError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| InputError::InvalidDate {
        field,
        expected: "date (YYYY-MM-DD)",
        value: raw.to_string(),
    })
}

/// RFC 3339 timestamp, normalized to UTC.
pub fn date_time(field: &'static str, raw: &str) -> Result<DateTime<Utc>, InputError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| InputError::InvalidDate {
            field,
            expected: "RFC 3339 date-time",
            value: raw.to_string(),
        })
}

/// Deserialize a nullable patch slot so that an explicit `null` becomes
/// `Some(None)` while an absent key stays `None` (via `#[serde(default)]`).
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
