//! Statistics endpoints for the librarian dashboard

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

use super::AuthenticatedUser;

/// Dashboard counters
#[derive(Serialize, ToSchema)]
pub struct StatsResponse {
    /// Number of books in the catalog
    pub total_books: i64,
    /// Books with at least one available copy
    pub available_books: i64,
    /// Registered users
    pub total_users: i64,
    /// Active loans
    pub active_loans: i64,
    /// Active loans past their due date (computed)
    pub overdue_loans: i64,
}

/// Get library statistics (librarian only)
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Library statistics", body = StatsResponse),
        (status = 403, description = "Librarian privileges required")
    )
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<StatsResponse>> {
    claims.require_librarian()?;

    let stats = state.services.stats.get_stats().await?;
    Ok(Json(stats))
}
