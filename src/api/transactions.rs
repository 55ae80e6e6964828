//! Circulation (borrow/return) endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::transaction::{BorrowBook, Transaction, TransactionDetails},
};

use super::AuthenticatedUser;

/// Borrow request
#[derive(Deserialize, ToSchema)]
pub struct BorrowRequest {
    /// Book to borrow
    pub book_id: Uuid,
    /// Borrowing user
    pub user_id: Uuid,
}

/// Borrow response with the created transaction
#[derive(Serialize, ToSchema)]
pub struct BorrowResponse {
    /// Status message
    pub message: String,
    /// The created transaction
    pub transaction: Transaction,
}

/// Return response with the closed transaction
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    /// Return status
    pub status: String,
    /// The closed transaction
    pub transaction: Transaction,
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/transactions",
    tag = "transactions",
    security(("bearer_auth" = [])),
    request_body = BorrowRequest,
    responses(
        (status = 201, description = "Book borrowed", body = BorrowResponse),
        (status = 403, description = "Cannot borrow for another user"),
        (status = 404, description = "Book or user not found"),
        (status = 422, description = "Book unavailable, loan cap reached, or already borrowed")
    )
)]
pub async fn borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<BorrowRequest>,
) -> AppResult<(StatusCode, Json<BorrowResponse>)> {
    // Students borrow for themselves; librarians for anyone
    claims.require_self_or_librarian(request.user_id)?;

    let transaction = state
        .services
        .circulation
        .borrow(BorrowBook {
            book_id: request.book_id,
            user_id: request.user_id,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(BorrowResponse {
            message: "Book borrowed successfully".to_string(),
            transaction,
        }),
    ))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/transactions/{id}/return",
    tag = "transactions",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Transaction ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 403, description = "Cannot return another user's loan"),
        (status = 404, description = "Transaction not found"),
        (status = 422, description = "Already returned")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(transaction_id): Path<Uuid>,
) -> AppResult<Json<ReturnResponse>> {
    let transaction = state.services.circulation.get(transaction_id).await?;
    claims.require_self_or_librarian(transaction.user_id)?;

    let transaction = state.services.circulation.return_book(transaction_id).await?;

    Ok(Json(ReturnResponse {
        status: "returned".to_string(),
        transaction,
    }))
}

/// List all transactions with borrower and book details (librarian only)
#[utoipa::path(
    get,
    path = "/transactions",
    tag = "transactions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All transactions", body = Vec<TransactionDetails>),
        (status = 403, description = "Librarian privileges required")
    )
)]
pub async fn list_transactions(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<TransactionDetails>>> {
    claims.require_librarian()?;

    let transactions = state.services.circulation.list_all().await?;
    Ok(Json(transactions))
}

/// List transactions currently out (librarian only)
#[utoipa::path(
    get,
    path = "/transactions/active",
    tag = "transactions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active and overdue transactions", body = Vec<Transaction>),
        (status = 403, description = "Librarian privileges required")
    )
)]
pub async fn list_active_transactions(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Transaction>>> {
    claims.require_librarian()?;

    let transactions = state.services.circulation.list_active().await?;
    Ok(Json(transactions))
}
