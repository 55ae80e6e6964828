//! Books repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, BookStatus, CreateBook, UpdateBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// All books, for building the recommendation digest
    pub async fn list_all(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY title")
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    /// Search books with filters and pagination
    pub async fn search(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let mut conditions = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(ref q) = query.q {
            params.push(format!("%{}%", q.to_lowercase()));
            conditions.push(format!(
                "(LOWER(title) LIKE ${n} OR LOWER(author) LIKE ${n} OR LOWER(isbn) LIKE ${n})",
                n = params.len()
            ));
        }

        if let Some(ref genre) = query.genre {
            params.push(genre.clone());
            conditions.push(format!("genre = ${}", params.len()));
        }

        if let Some(status) = query.status {
            params.push(status.as_str().to_string());
            conditions.push(format!("status = ${}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM books {}", where_clause);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for param in &params {
            count_query = count_query.bind(param);
        }
        let total = count_query.fetch_one(&self.pool).await?;

        let list_sql = format!(
            "SELECT * FROM books {} ORDER BY title LIMIT {} OFFSET {}",
            where_clause, per_page, offset
        );
        let mut list_query = sqlx::query_as::<_, Book>(&list_sql);
        for param in &params {
            list_query = list_query.bind(param);
        }
        let books = list_query.fetch_all(&self.pool).await?;

        Ok((books, total))
    }

    /// Check if ISBN already exists
    pub async fn isbn_exists(&self, isbn: &str, exclude_id: Option<Uuid>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1 AND id != $2)")
                .bind(isbn)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
                .bind(isbn)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Create a new book. New books start fully available.
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let total_copies = book.total_copies.unwrap_or(1);

        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, isbn, genre, publisher, publication_year,
                               description, cover_url, status, total_copies, available_copies)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(&book.genre)
        .bind(&book.publisher)
        .bind(book.publication_year)
        .bind(&book.description)
        .bind(&book.cover_url)
        .bind(BookStatus::Available)
        .bind(total_copies)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update a book (partial). Unset fields keep their current value.
    pub async fn update(&self, id: Uuid, update: &UpdateBook) -> AppResult<Book> {
        let current = self.get_by_id(id).await?;

        let total_copies = update.total_copies.unwrap_or(current.total_copies);
        let available_copies = update.available_copies.unwrap_or(current.available_copies);

        if available_copies < 0 || available_copies > total_copies {
            return Err(AppError::Validation(format!(
                "available_copies must be between 0 and {}",
                total_copies
            )));
        }

        let updated = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = $1, author = $2, isbn = $3, genre = $4, publisher = $5,
                publication_year = $6, description = $7, cover_url = $8, status = $9,
                total_copies = $10, available_copies = $11
            WHERE id = $12
            RETURNING *
            "#,
        )
        .bind(update.title.as_ref().unwrap_or(&current.title))
        .bind(update.author.as_ref().unwrap_or(&current.author))
        .bind(update.isbn.as_ref().unwrap_or(&current.isbn))
        .bind(update.genre.as_ref().unwrap_or(&current.genre))
        .bind(update.publisher.as_ref().or(current.publisher.as_ref()))
        .bind(update.publication_year.or(current.publication_year))
        .bind(update.description.as_ref().or(current.description.as_ref()))
        .bind(update.cover_url.as_ref().or(current.cover_url.as_ref()))
        .bind(update.status.unwrap_or(current.status))
        .bind(total_copies)
        .bind(available_copies)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Delete a book
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        Ok(())
    }

    /// Count all books
    pub async fn count_total(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count books with at least one available copy
    pub async fn count_available(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE available_copies > 0")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
