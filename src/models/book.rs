//! Book record model and request/query types.
//!
//! `Book` is the stored record. `BookPayload` is the input schema shared by
//! create and update, `BookShort` the projection used by listings and
//! `BookQuery` the list filter.

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Full book record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub name: String,
    pub year: i32,
    pub author: String,
    pub summary: String,
    pub publisher: String,
    pub page_count: u32,
    pub read_page: u32,
    /// Always `read_page == page_count` as of the last write
    pub finished: bool,
    pub reading: bool,
    pub inserted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Build a new record from a validated payload.
    pub fn new(id: String, payload: BookPayload, now: DateTime<Utc>) -> Self {
        let finished = payload.read_page == payload.page_count;
        Self {
            id,
            name: payload.name.unwrap_or_default(),
            year: payload.year,
            author: payload.author,
            summary: payload.summary,
            publisher: payload.publisher,
            page_count: payload.page_count,
            read_page: payload.read_page,
            finished,
            reading: payload.reading,
            inserted_at: now,
            updated_at: now,
        }
    }

    /// Overwrite every mutable field from a validated payload.
    /// `id` and `inserted_at` are kept; `updated_at` never moves backwards.
    pub fn apply(&mut self, payload: BookPayload, now: DateTime<Utc>) {
        self.name = payload.name.unwrap_or_default();
        self.year = payload.year;
        self.author = payload.author;
        self.summary = payload.summary;
        self.publisher = payload.publisher;
        self.page_count = payload.page_count;
        self.read_page = payload.read_page;
        self.reading = payload.reading;
        self.finished = self.read_page == self.page_count;
        self.updated_at = now.max(self.updated_at);
    }
}

/// Short book representation for listings
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BookShort {
    pub id: String,
    pub name: String,
    pub publisher: String,
}

impl From<&Book> for BookShort {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            name: book.name.clone(),
            publisher: book.publisher.clone(),
        }
    }
}

/// Create / update book request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
#[validate(schema(function = "validate_page_progress", skip_on_field_errors = true))]
pub struct BookPayload {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub year: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub publisher: String,
    #[serde(deserialize_with = "null_as_default")]
    pub page_count: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub read_page: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub reading: bool,
}

/// Explicit `null` is read the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn validate_page_progress(payload: &BookPayload) -> Result<(), ValidationError> {
    if payload.read_page > payload.page_count {
        return Err(ValidationError::new("read_page_exceeds_page_count"));
    }
    Ok(())
}

/// First rule a payload breaks, in checking order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadIssue {
    MissingName,
    ReadPageExceedsPageCount,
}

impl PayloadIssue {
    pub fn create_message(self) -> &'static str {
        match self {
            PayloadIssue::MissingName => "name required to add book",
            PayloadIssue::ReadPageExceedsPageCount => "readPage cannot exceed pageCount",
        }
    }

    pub fn update_message(self) -> &'static str {
        match self {
            PayloadIssue::MissingName => "name required",
            PayloadIssue::ReadPageExceedsPageCount => "readPage exceeds pageCount",
        }
    }
}

impl BookPayload {
    /// Check the name first, then page progress.
    pub fn check(&self) -> Result<(), PayloadIssue> {
        match self.validate() {
            Ok(()) => Ok(()),
            Err(errors) if errors.errors().contains_key("name") => Err(PayloadIssue::MissingName),
            Err(_) => Err(PayloadIssue::ReadPageExceedsPageCount),
        }
    }
}

/// List filters. All present filters must match.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive substring of the book name
    pub name: Option<String>,
    /// `1`/`true` or `0`/`false`, case-insensitive
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub reading: Option<bool>,
    /// `1`/`true` or `0`/`false`, case-insensitive
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub finished: Option<bool>,
}

impl BookQuery {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.reading.is_none() && self.finished.is_none()
    }

    pub fn matches(&self, book: &Book) -> bool {
        if let Some(ref name) = self.name {
            if !book.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }
        if self.reading.is_some_and(|reading| book.reading != reading) {
            return false;
        }
        if self.finished.is_some_and(|finished| book.finished != finished) {
            return false;
        }
        true
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(value) = raw.as_deref().map(str::trim) else {
        return Ok(None);
    };
    if value.is_empty() {
        Ok(None)
    } else if value == "1" || value.eq_ignore_ascii_case("true") {
        Ok(Some(true))
    } else if value == "0" || value.eq_ignore_ascii_case("false") {
        Ok(Some(false))
    } else {
        Err(de::Error::custom(format!("invalid flag value `{}`", value)))
    }
}
