//! Transactions repository: the borrow/return state transitions and listings

use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::BookSummary,
        profile::ProfileSummary,
        transaction::{
            due_date, BorrowBook, Transaction, TransactionDetails, TransactionStatus,
            MAX_ACTIVE_LOANS,
        },
    },
};

#[derive(Clone)]
pub struct TransactionsRepository {
    pool: Pool<Postgres>,
}

impl TransactionsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get transaction by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Transaction> {
        sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Transaction with id {} not found", id)))
    }

    /// Borrow a book: create an active transaction and decrement the book's
    /// available-copy counter.
    ///
    /// Rules enforced here, in order:
    /// - the book must have an available copy;
    /// - the user may hold at most `MAX_ACTIVE_LOANS` active loans;
    /// - the user may not hold two active loans of the same book.
    ///
    /// The book row is locked for the duration so the counter, the status flag
    /// and the loan row move together.
    pub async fn borrow(&self, borrow: &BorrowBook) -> AppResult<Transaction> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let book_row = sqlx::query(
            "SELECT status, available_copies FROM books WHERE id = $1 FOR UPDATE",
        )
        .bind(borrow.book_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", borrow.book_id)))?;

        let available_copies: i32 = book_row.get("available_copies");
        let status: crate::models::BookStatus = book_row.get("status");

        if available_copies <= 0 {
            return Err(AppError::BusinessRule("Book is not available".to_string()));
        }

        let active_loans: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM transactions WHERE user_id = $1 AND status = 'ACTIVE'",
        )
        .bind(borrow.user_id)
        .fetch_one(&mut *tx)
        .await?;

        if active_loans >= MAX_ACTIVE_LOANS {
            return Err(AppError::BusinessRule(format!(
                "You cannot borrow more than {} books at a time",
                MAX_ACTIVE_LOANS
            )));
        }

        let already_borrowed: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM transactions
                WHERE user_id = $1 AND book_id = $2 AND status = 'ACTIVE'
            )
            "#,
        )
        .bind(borrow.user_id)
        .bind(borrow.book_id)
        .fetch_one(&mut *tx)
        .await?;

        if already_borrowed {
            return Err(AppError::BusinessRule(
                "You have already borrowed this book".to_string(),
            ));
        }

        let created = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (user_id, book_id, borrow_date, due_date, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(borrow.user_id)
        .bind(borrow.book_id)
        .bind(now)
        .bind(due_date(now))
        .bind(TransactionStatus::Active)
        .fetch_one(&mut *tx)
        .await?;

        let remaining = available_copies - 1;
        sqlx::query("UPDATE books SET available_copies = $1, status = $2 WHERE id = $3")
            .bind(remaining)
            .bind(status.after_circulation(remaining))
            .bind(borrow.book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    /// Return a borrowed book: stamp the transaction and give the copy back
    /// to the book's available counter.
    pub async fn return_book(&self, transaction_id: Uuid) -> AppResult<Transaction> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let loan = sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions WHERE id = $1 FOR UPDATE",
        )
        .bind(transaction_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Transaction with id {} not found", transaction_id))
        })?;

        if loan.return_date.is_some() {
            return Err(AppError::BusinessRule("Transaction already returned".to_string()));
        }

        let returned = sqlx::query_as::<_, Transaction>(
            r#"
            UPDATE transactions
            SET return_date = $1, status = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(now)
        .bind(TransactionStatus::Returned)
        .bind(transaction_id)
        .fetch_one(&mut *tx)
        .await?;

        let book_row = sqlx::query(
            "SELECT status, total_copies, available_copies FROM books WHERE id = $1 FOR UPDATE",
        )
        .bind(loan.book_id)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(row) = book_row {
            let total_copies: i32 = row.get("total_copies");
            let available_copies: i32 = row.get("available_copies");
            let status: crate::models::BookStatus = row.get("status");

            let restored = (available_copies + 1).min(total_copies);
            sqlx::query("UPDATE books SET available_copies = $1, status = $2 WHERE id = $3")
                .bind(restored)
                .bind(status.after_circulation(restored))
                .bind(loan.book_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(returned)
    }

    /// All transactions with borrower and book details, newest first
    pub async fn list_all(&self) -> AppResult<Vec<TransactionDetails>> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.borrow_date, t.due_date, t.return_date, t.status,
                   b.id as book_id, b.title, b.author, b.isbn, b.genre, b.cover_url,
                   p.id as profile_id, p.name, p.email
            FROM transactions t
            JOIN books b ON t.book_id = b.id
            JOIN profiles p ON t.user_id = p.id
            ORDER BY t.borrow_date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let now = Utc::now();
        let details = rows
            .into_iter()
            .map(|row| Self::details_from_row(&row, true, now))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(details)
    }

    /// A user's transactions with book details, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<TransactionDetails>> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.borrow_date, t.due_date, t.return_date, t.status,
                   b.id as book_id, b.title, b.author, b.isbn, b.genre, b.cover_url
            FROM transactions t
            JOIN books b ON t.book_id = b.id
            WHERE t.user_id = $1
            ORDER BY t.borrow_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let now = Utc::now();
        let details = rows
            .into_iter()
            .map(|row| Self::details_from_row(&row, false, now))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(details)
    }

    /// Transactions currently out (active or flagged overdue)
    pub async fn list_active(&self) -> AppResult<Vec<Transaction>> {
        let transactions = sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions WHERE status IN ('ACTIVE', 'OVERDUE') ORDER BY due_date",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(transactions)
    }

    /// Whether a book still has active loans (guards catalog deletion)
    pub async fn book_has_active(&self, book_id: Uuid) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM transactions WHERE book_id = $1 AND status = 'ACTIVE')",
        )
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Count active loans
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE status = 'ACTIVE'")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Count overdue loans (computed, not persisted)
    pub async fn count_overdue(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM transactions WHERE status = 'ACTIVE' AND due_date < NOW()",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    fn details_from_row(
        row: &sqlx::postgres::PgRow,
        with_user: bool,
        now: chrono::DateTime<Utc>,
    ) -> Result<TransactionDetails, sqlx::Error> {
        let status: TransactionStatus = row.try_get("status")?;
        let due: chrono::DateTime<Utc> = row.try_get("due_date")?;

        let user = if with_user {
            Some(ProfileSummary {
                id: row.try_get("profile_id")?,
                name: row.try_get("name")?,
                email: row.try_get("email")?,
            })
        } else {
            None
        };

        Ok(TransactionDetails {
            id: row.try_get("id")?,
            borrow_date: row.try_get("borrow_date")?,
            due_date: due,
            return_date: row.try_get("return_date")?,
            status,
            is_overdue: status == TransactionStatus::Active && due < now,
            book: BookSummary {
                id: row.try_get("book_id")?,
                title: row.try_get("title")?,
                author: row.try_get("author")?,
                isbn: row.try_get("isbn")?,
                genre: row.try_get("genre")?,
                cover_url: row.try_get("cover_url")?,
            },
            user,
        })
    }
}
