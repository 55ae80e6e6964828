//! User (profile) endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::profile::{Profile, UpdateProfile},
    models::transaction::TransactionDetails,
};

use super::AuthenticatedUser;

/// List all users (librarian only)
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users", body = Vec<Profile>),
        (status = 403, description = "Librarian privileges required")
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Profile>>> {
    claims.require_librarian()?;

    let profiles = state.services.auth.list_profiles().await?;
    Ok(Json(profiles))
}

/// Get a user by ID (self or librarian)
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = Profile),
        (status = 403, description = "Cannot read another user's profile"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Profile>> {
    claims.require_self_or_librarian(id)?;

    let profile = state.services.auth.profile(id).await?;
    Ok(Json(profile))
}

/// Update a user. Contact fields are self-service; role changes are the
/// librarian role-management surface.
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "User updated", body = Profile),
        (status = 403, description = "Not allowed"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateProfile>,
) -> AppResult<Json<Profile>> {
    claims.require_self_or_librarian(id)?;
    if update.role.is_some() {
        claims.require_librarian()?;
    }

    let updated = state.services.auth.update_profile(id, update).await?;
    Ok(Json(updated))
}

/// Get transactions for a user (self or librarian)
#[utoipa::path(
    get,
    path = "/users/{id}/transactions",
    tag = "transactions",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User's transactions", body = Vec<TransactionDetails>),
        (status = 403, description = "Cannot read another user's transactions"),
        (status = 404, description = "User not found")
    )
)]
pub async fn user_transactions(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<TransactionDetails>>> {
    claims.require_self_or_librarian(id)?;

    let transactions = state.services.circulation.user_transactions(id).await?;
    Ok(Json(transactions))
}
