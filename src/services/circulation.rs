//! Circulation service: the borrow/return workflow

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::transaction::{BorrowBook, Transaction, TransactionDetails},
    repository::Repository,
    services::email::EmailService,
};

#[derive(Clone)]
pub struct CirculationService {
    repository: Repository,
    email: EmailService,
}

impl CirculationService {
    pub fn new(repository: Repository, email: EmailService) -> Self {
        Self { repository, email }
    }

    /// Borrow a book for a user. Sends a confirmation email when SMTP is
    /// configured; delivery failures never fail the borrow.
    pub async fn borrow(&self, borrow: BorrowBook) -> AppResult<Transaction> {
        // Verify user exists
        let profile = self.repository.profiles.get_by_id(borrow.user_id).await?;

        let transaction = self.repository.transactions.borrow(&borrow).await?;

        match self.repository.books.get_by_id(transaction.book_id).await {
            Ok(book) => {
                if let Err(e) = self
                    .email
                    .send_borrow_confirmation(
                        &profile.email,
                        &profile.name,
                        &book.title,
                        transaction.due_date,
                    )
                    .await
                {
                    tracing::warn!("Failed to send borrow confirmation: {}", e);
                }
            }
            Err(e) => tracing::warn!("Borrow confirmation skipped: {}", e),
        }

        Ok(transaction)
    }

    /// Return a borrowed book
    pub async fn return_book(&self, transaction_id: Uuid) -> AppResult<Transaction> {
        self.repository.transactions.return_book(transaction_id).await
    }

    /// Get transactions for a user
    pub async fn user_transactions(&self, user_id: Uuid) -> AppResult<Vec<TransactionDetails>> {
        // Verify user exists
        self.repository.profiles.get_by_id(user_id).await?;
        self.repository.transactions.list_for_user(user_id).await
    }

    /// All transactions with borrower and book details
    pub async fn list_all(&self) -> AppResult<Vec<TransactionDetails>> {
        self.repository.transactions.list_all().await
    }

    /// Transactions currently out
    pub async fn list_active(&self) -> AppResult<Vec<Transaction>> {
        self.repository.transactions.list_active().await
    }

    /// Get a single transaction
    pub async fn get(&self, transaction_id: Uuid) -> AppResult<Transaction> {
        self.repository.transactions.get_by_id(transaction_id).await
    }
}
