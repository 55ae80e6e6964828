//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, chat, health, stats, transactions, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Athenaeum API",
        version = "0.1.0",
        description = "Library Management System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Users
        users::list_users,
        users::get_user,
        users::update_user,
        users::user_transactions,
        // Transactions
        transactions::borrow,
        transactions::return_book,
        transactions::list_transactions,
        transactions::list_active_transactions,
        // Chat
        chat::chat_about_book,
        chat::recommend,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            // Auth
            auth::AuthResponse,
            crate::models::profile::Register,
            crate::models::profile::Login,
            // Books
            crate::models::book::Book,
            crate::models::book::BookStatus,
            crate::models::book::BookSummary,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::book::BookQuery,
            // Users
            crate::models::profile::Profile,
            crate::models::profile::ProfileSummary,
            crate::models::profile::Role,
            crate::models::profile::UpdateProfile,
            // Transactions
            transactions::BorrowRequest,
            transactions::BorrowResponse,
            transactions::ReturnResponse,
            crate::models::transaction::Transaction,
            crate::models::transaction::TransactionStatus,
            crate::models::transaction::TransactionDetails,
            // Chat
            chat::BookChatRequest,
            chat::RecommendRequest,
            chat::ChatResponse,
            crate::services::chat::ChatMessage,
            crate::services::chat::ChatRole,
            // Stats
            stats::StatsResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "books", description = "Catalog management"),
        (name = "users", description = "User management"),
        (name = "transactions", description = "Borrow and return workflow"),
        (name = "chat", description = "Reading assistant"),
        (name = "stats", description = "Statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
