//! Book (catalog entry) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Book availability status. Stored as TEXT in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookStatus {
    Available,
    Borrowed,
    Reserved,
    Maintenance,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "AVAILABLE",
            BookStatus::Borrowed => "BORROWED",
            BookStatus::Reserved => "RESERVED",
            BookStatus::Maintenance => "MAINTENANCE",
        }
    }

    /// Status after a circulation event changed the available-copy count.
    ///
    /// Only the Available/Borrowed pair is derived from the counter;
    /// Reserved and Maintenance are librarian-set and never toggled here.
    pub fn after_circulation(self, available_copies: i32) -> BookStatus {
        match self {
            BookStatus::Reserved | BookStatus::Maintenance => self,
            _ if available_copies > 0 => BookStatus::Available,
            _ => BookStatus::Borrowed,
        }
    }
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "AVAILABLE" => Ok(BookStatus::Available),
            "BORROWED" => Ok(BookStatus::Borrowed),
            "RESERVED" => Ok(BookStatus::Reserved),
            "MAINTENANCE" => Ok(BookStatus::Maintenance),
            _ => Err(format!("Invalid book status: {}", s)),
        }
    }
}

// SQLx conversion for BookStatus (TEXT-backed)
impl sqlx::Type<Postgres> for BookStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for BookStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for BookStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Full book model (DB + API)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub genre: String,
    pub publisher: Option<String>,
    pub publication_year: Option<i32>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub status: BookStatus,
    pub total_copies: i32,
    pub available_copies: i32,
    pub created_at: DateTime<Utc>,
}

/// Short book representation embedded in transaction listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookSummary {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub genre: Option<String>,
    pub cover_url: Option<String>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    #[validate(length(min = 1, message = "ISBN is required"))]
    pub isbn: String,
    #[validate(length(min = 1, message = "Genre is required"))]
    pub genre: String,
    pub publisher: Option<String>,
    pub publication_year: Option<i32>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    #[validate(range(min = 1, message = "At least one copy is required"))]
    pub total_copies: Option<i32>,
}

/// Update book request (partial)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub genre: Option<String>,
    pub publisher: Option<String>,
    pub publication_year: Option<i32>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub status: Option<BookStatus>,
    pub total_copies: Option<i32>,
    pub available_copies: Option<i32>,
}

/// Book query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Matches title, author or ISBN (case-insensitive substring)
    pub q: Option<String>,
    pub genre: Option<String>,
    pub status: Option<BookStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for s in ["AVAILABLE", "BORROWED", "RESERVED", "MAINTENANCE"] {
            let status: BookStatus = s.parse().unwrap();
            assert_eq!(status.as_str(), s);
        }
        assert!("LOST".parse::<BookStatus>().is_err());
    }

    #[test]
    fn test_after_circulation_flips_available_borrowed() {
        assert_eq!(BookStatus::Available.after_circulation(0), BookStatus::Borrowed);
        assert_eq!(BookStatus::Borrowed.after_circulation(1), BookStatus::Available);
        assert_eq!(BookStatus::Available.after_circulation(3), BookStatus::Available);
    }

    #[test]
    fn test_after_circulation_keeps_librarian_states() {
        assert_eq!(BookStatus::Reserved.after_circulation(0), BookStatus::Reserved);
        assert_eq!(BookStatus::Maintenance.after_circulation(5), BookStatus::Maintenance);
    }
}
