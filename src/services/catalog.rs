//! Catalog management service

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Search books with filters
    pub async fn search_books(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        self.repository.books.search(query).await
    }

    /// Get book by ID
    pub async fn get_book(&self, id: Uuid) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Create a new book. Duplicate ISBNs are rejected.
    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()?;

        if self.repository.books.isbn_exists(&book.isbn, None).await? {
            return Err(AppError::Conflict(format!(
                "A book with ISBN {} already exists",
                book.isbn
            )));
        }

        self.repository.books.create(&book).await
    }

    /// Update an existing book
    pub async fn update_book(&self, id: Uuid, update: UpdateBook) -> AppResult<Book> {
        if let Some(ref isbn) = update.isbn {
            if self.repository.books.isbn_exists(isbn, Some(id)).await? {
                return Err(AppError::Conflict(format!(
                    "A book with ISBN {} already exists",
                    isbn
                )));
            }
        }

        self.repository.books.update(id, &update).await
    }

    /// Delete a book. Refused while copies are still out.
    pub async fn delete_book(&self, id: Uuid) -> AppResult<()> {
        if self.repository.transactions.book_has_active(id).await? {
            return Err(AppError::BusinessRule("Book has active loans".to_string()));
        }

        self.repository.books.delete(id).await
    }

    /// Full catalog, for the recommendation assistant
    pub async fn list_all(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list_all().await
    }
}
