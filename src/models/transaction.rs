//! Transaction (loan) model and related types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;

use super::book::BookSummary;
use super::profile::ProfileSummary;

/// Fixed loan period applied to every borrow.
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// Per-user cap on concurrently active loans.
pub const MAX_ACTIVE_LOANS: i64 = 3;

/// Due date for a loan starting at `borrow_date`.
pub fn due_date(borrow_date: DateTime<Utc>) -> DateTime<Utc> {
    borrow_date + Duration::days(LOAN_PERIOD_DAYS)
}

/// Transaction lifecycle status. Stored as TEXT in the database.
///
/// The server only ever writes Active and Returned; Overdue and Lost are
/// librarian-set. Overdue is additionally *computed* per row (`is_overdue`),
/// never persisted by a background process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Active,
    Returned,
    Overdue,
    Lost,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Active => "ACTIVE",
            TransactionStatus::Returned => "RETURNED",
            TransactionStatus::Overdue => "OVERDUE",
            TransactionStatus::Lost => "LOST",
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ACTIVE" => Ok(TransactionStatus::Active),
            "RETURNED" => Ok(TransactionStatus::Returned),
            "OVERDUE" => Ok(TransactionStatus::Overdue),
            "LOST" => Ok(TransactionStatus::Lost),
            _ => Err(format!("Invalid transaction status: {}", s)),
        }
    }
}

// SQLx conversion for TransactionStatus (TEXT-backed)
impl sqlx::Type<Postgres> for TransactionStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for TransactionStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for TransactionStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Transaction model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// A loan is overdue while it is still active past its due date.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == TransactionStatus::Active && self.due_date < now
    }
}

/// Transaction with joined borrower and book details for listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransactionDetails {
    pub id: Uuid,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub status: TransactionStatus,
    pub is_overdue: bool,
    pub book: BookSummary,
    pub user: Option<ProfileSummary>,
}

/// Borrow request passed to the circulation service
#[derive(Debug, Deserialize)]
pub struct BorrowBook {
    pub book_id: Uuid,
    pub user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_due_date_is_fourteen_days() {
        let borrow = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(due_date(borrow), Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_status_round_trip() {
        for s in ["ACTIVE", "RETURNED", "OVERDUE", "LOST"] {
            let status: TransactionStatus = s.parse().unwrap();
            assert_eq!(status.as_str(), s);
        }
        assert!("PENDING".parse::<TransactionStatus>().is_err());
    }

    #[test]
    fn test_is_overdue_only_while_active() {
        let now = Utc.with_ymd_and_hms(2026, 3, 20, 0, 0, 0).unwrap();
        let mut tx = Transaction {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            book_id: Uuid::new_v4(),
            borrow_date: now - Duration::days(20),
            due_date: now - Duration::days(6),
            return_date: None,
            status: TransactionStatus::Active,
            created_at: now - Duration::days(20),
        };
        assert!(tx.is_overdue(now));

        tx.status = TransactionStatus::Returned;
        tx.return_date = Some(now - Duration::days(1));
        assert!(!tx.is_overdue(now));

        tx.status = TransactionStatus::Active;
        tx.due_date = now + Duration::days(1);
        assert!(!tx.is_overdue(now));
    }
}
