//! API integration tests
//!
//! These run against a live server with a seeded librarian account
//! (librarian@example.org / password). Run with: cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get a librarian token
async fn get_librarian_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "librarian@example.org",
            "password": "password"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Helper to register a fresh student and return (token, user id)
async fn register_student(client: &Client) -> (String, String) {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "email": format!("student-{}@example.org", suffix),
            "password": "password",
            "name": "Test Student"
        }))
        .send()
        .await
        .expect("Failed to send register request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse register response");
    (
        body["token"].as_str().expect("No token").to_string(),
        body["user"]["id"].as_str().expect("No user id").to_string(),
    )
}

/// Helper to create a book as librarian, returns its id
async fn create_book(client: &Client, token: &str, isbn: &str) -> String {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Integration Test Book",
            "author": "Test Author",
            "isbn": isbn,
            "genre": "Fiction",
            "total_copies": 1
        }))
        .send()
        .await
        .expect("Failed to send create book request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse book response");
    body["id"].as_str().expect("No book id").to_string()
}

fn unique_isbn() -> String {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("test-{}", suffix)
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "librarian@example.org",
            "password": "password"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["role"], "LIBRARIAN");
    assert!(body["user"]["password_hash"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "librarian@example.org",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_get_current_user() {
    let client = Client::new();
    let token = get_librarian_token(&client).await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["email"], "librarian@example.org");
}

#[tokio::test]
#[ignore]
async fn test_list_books() {
    let client = Client::new();
    let token = get_librarian_token(&client).await;

    let response = client
        .get(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert!(body["total"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_student_cannot_create_book() {
    let client = Client::new();
    let (token, _) = register_student(&client).await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Forbidden",
            "author": "Nobody",
            "isbn": unique_isbn(),
            "genre": "Fiction"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_borrow_and_return_cycle() {
    let client = Client::new();
    let librarian = get_librarian_token(&client).await;
    let (student, student_id) = register_student(&client).await;
    let book_id = create_book(&client, &librarian, &unique_isbn()).await;

    // Borrow the only copy
    let response = client
        .post(format!("{}/transactions", BASE_URL))
        .header("Authorization", format!("Bearer {}", student))
        .json(&json!({ "book_id": book_id, "user_id": student_id }))
        .send()
        .await
        .expect("Failed to send borrow request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse borrow response");
    let transaction_id = body["transaction"]["id"].as_str().expect("No transaction id").to_string();
    assert_eq!(body["transaction"]["status"], "ACTIVE");

    // The book is now out of copies
    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", student))
        .send()
        .await
        .expect("Failed to fetch book");
    let book: Value = response.json().await.expect("Failed to parse book");
    assert_eq!(book["available_copies"], 0);
    assert_eq!(book["status"], "BORROWED");

    // Borrowing it again is rejected
    let response = client
        .post(format!("{}/transactions", BASE_URL))
        .header("Authorization", format!("Bearer {}", student))
        .json(&json!({ "book_id": book_id, "user_id": student_id }))
        .send()
        .await
        .expect("Failed to send borrow request");
    assert_eq!(response.status(), 422);

    // Return it
    let response = client
        .post(format!("{}/transactions/{}/return", BASE_URL, transaction_id))
        .header("Authorization", format!("Bearer {}", student))
        .send()
        .await
        .expect("Failed to send return request");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse return response");
    assert_eq!(body["status"], "returned");
    assert_eq!(body["transaction"]["status"], "RETURNED");

    // Returning twice is rejected
    let response = client
        .post(format!("{}/transactions/{}/return", BASE_URL, transaction_id))
        .header("Authorization", format!("Bearer {}", student))
        .send()
        .await
        .expect("Failed to send return request");
    assert_eq!(response.status(), 422);

    // The copy is back on the shelf
    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", student))
        .send()
        .await
        .expect("Failed to fetch book");
    let book: Value = response.json().await.expect("Failed to parse book");
    assert_eq!(book["available_copies"], 1);
    assert_eq!(book["status"], "AVAILABLE");
}

#[tokio::test]
#[ignore]
async fn test_loan_cap() {
    let client = Client::new();
    let librarian = get_librarian_token(&client).await;
    let (student, student_id) = register_student(&client).await;

    // Borrow three books, then a fourth
    for i in 0..3 {
        let book_id = create_book(&client, &librarian, &format!("{}-{}", unique_isbn(), i)).await;
        let response = client
            .post(format!("{}/transactions", BASE_URL))
            .header("Authorization", format!("Bearer {}", student))
            .json(&json!({ "book_id": book_id, "user_id": student_id }))
            .send()
            .await
            .expect("Failed to send borrow request");
        assert_eq!(response.status(), 201);
    }

    let book_id = create_book(&client, &librarian, &unique_isbn()).await;
    let response = client
        .post(format!("{}/transactions", BASE_URL))
        .header("Authorization", format!("Bearer {}", student))
        .json(&json!({ "book_id": book_id, "user_id": student_id }))
        .send()
        .await
        .expect("Failed to send borrow request");

    assert_eq!(response.status(), 422);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"]
        .as_str()
        .unwrap_or_default()
        .contains("cannot borrow more than"));
}

#[tokio::test]
#[ignore]
async fn test_student_cannot_borrow_for_another_user() {
    let client = Client::new();
    let librarian = get_librarian_token(&client).await;
    let (student, _) = register_student(&client).await;
    let (_, other_id) = register_student(&client).await;
    let book_id = create_book(&client, &librarian, &unique_isbn()).await;

    let response = client
        .post(format!("{}/transactions", BASE_URL))
        .header("Authorization", format!("Bearer {}", student))
        .json(&json!({ "book_id": book_id, "user_id": other_id }))
        .send()
        .await
        .expect("Failed to send borrow request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_stats_requires_librarian() {
    let client = Client::new();
    let (student, _) = register_student(&client).await;

    let response = client
        .get(format!("{}/stats", BASE_URL))
        .header("Authorization", format!("Bearer {}", student))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);

    let librarian = get_librarian_token(&client).await;
    let response = client
        .get(format!("{}/stats", BASE_URL))
        .header("Authorization", format!("Bearer {}", librarian))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["total_books"].is_number());
    assert!(body["overdue_loans"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_chat_requires_messages() {
    let client = Client::new();
    let librarian = get_librarian_token(&client).await;

    let response = client
        .post(format!("{}/chat/recommend", BASE_URL))
        .header("Authorization", format!("Bearer {}", librarian))
        .json(&json!({ "messages": [] }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}
