//! Reading assistant endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    services::chat::ChatMessage,
};

use super::AuthenticatedUser;

/// Chat request about a single book
#[derive(Deserialize, ToSchema)]
pub struct BookChatRequest {
    /// Book under discussion
    pub book_id: Uuid,
    /// Conversation so far (user/assistant turns)
    pub messages: Vec<ChatMessage>,
}

/// Recommendation chat request
#[derive(Deserialize, ToSchema)]
pub struct RecommendRequest {
    /// Conversation so far (user/assistant turns)
    pub messages: Vec<ChatMessage>,
}

/// Assistant reply
#[derive(Serialize, ToSchema)]
pub struct ChatResponse {
    pub reply: String,
}

/// Chat about a specific book
#[utoipa::path(
    post,
    path = "/chat/book",
    tag = "chat",
    security(("bearer_auth" = [])),
    request_body = BookChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatResponse),
        (status = 400, description = "Missing messages"),
        (status = 404, description = "Book not found"),
        (status = 502, description = "Assistant unavailable")
    )
)]
pub async fn chat_about_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(request): Json<BookChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    if request.messages.is_empty() {
        return Err(AppError::BadRequest("At least one message is required".to_string()));
    }

    let book = state.services.catalog.get_book(request.book_id).await?;
    let reply = state
        .services
        .chat
        .chat_about_book(&book, request.messages)
        .await?;

    Ok(Json(ChatResponse { reply }))
}

/// Get book recommendations from the catalog
#[utoipa::path(
    post,
    path = "/chat/recommend",
    tag = "chat",
    security(("bearer_auth" = [])),
    request_body = RecommendRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatResponse),
        (status = 400, description = "Missing messages"),
        (status = 502, description = "Assistant unavailable")
    )
)]
pub async fn recommend(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(request): Json<RecommendRequest>,
) -> AppResult<Json<ChatResponse>> {
    if request.messages.is_empty() {
        return Err(AppError::BadRequest("At least one message is required".to_string()));
    }

    let books = state.services.catalog.list_all().await?;
    let reply = state
        .services
        .chat
        .recommend(&books, request.messages)
        .await?;

    Ok(Json(ChatResponse { reply }))
}
