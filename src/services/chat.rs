//! Reading assistant service backed by an OpenAI-compatible chat API

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::{
    config::ChatConfig,
    error::{AppError, AppResult},
    models::book::Book,
};

/// Role of a conversation message. The system prompt is always server-built,
/// so clients may only send user and assistant turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// A single conversation turn
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[derive(Clone)]
pub struct ChatService {
    client: reqwest::Client,
    config: ChatConfig,
}

impl ChatService {
    pub fn new(config: ChatConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Discuss a single book with the assistant
    pub async fn chat_about_book(
        &self,
        book: &Book,
        messages: Vec<ChatMessage>,
    ) -> AppResult<String> {
        self.complete(book_prompt(book), messages).await
    }

    /// Recommend books from the catalog
    pub async fn recommend(&self, books: &[Book], messages: Vec<ChatMessage>) -> AppResult<String> {
        self.complete(recommendation_prompt(books), messages).await
    }

    async fn complete(&self, system_prompt: String, messages: Vec<ChatMessage>) -> AppResult<String> {
        let mut wire = Vec::with_capacity(messages.len() + 1);
        wire.push(WireMessage {
            role: "system".to_string(),
            content: system_prompt,
        });
        wire.extend(messages.into_iter().map(|m| WireMessage {
            role: m.role.as_str().to_string(),
            content: m.content,
        }));

        let request = CompletionRequest {
            model: self.config.model.clone(),
            messages: wire,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Assistant(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Assistant(format!(
                "Upstream returned {}: {}",
                status, body
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::Assistant(format!("Invalid response body: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::Assistant("Empty completion".to_string()))
    }
}

/// System prompt for the single-book discussion
fn book_prompt(book: &Book) -> String {
    format!(
        r#"You are a knowledgeable library assistant.
You are currently discussing the book: "{title}" by {author}.

Book Details:
- Title: {title}
- Author: {author}
- Genre: {genre}
- Description: {description}
- Publisher: {publisher}
- Year: {year}

Your INSTRUCTIONS:
1. Answer questions ONLY related to this specific book.
2. If the user asks about other books, general topics, or anything unrelated, politely refuse and steer the conversation back to "{title}".
3. Use the provided book details to answer specific questions.
4. You can use your general knowledge about this book (plot, characters, themes) if it is a real, well-known book, but prioritize the provided context.
5. Keep responses concise, friendly, and encouraging.

Remember: You are an expert on "{title}" and nothing else for this conversation."#,
        title = book.title,
        author = book.author,
        genre = book.genre,
        description = book.description.as_deref().unwrap_or("N/A"),
        publisher = book.publisher.as_deref().unwrap_or("N/A"),
        year = book
            .publication_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "N/A".to_string()),
    )
}

/// System prompt for catalog recommendations, with a compact digest of every book
fn recommendation_prompt(books: &[Book]) -> String {
    let digest: Vec<_> = books
        .iter()
        .map(|b| {
            json!({
                "id": b.id,
                "title": b.title,
                "author": b.author,
                "genre": b.genre,
                "description": digest_description(b.description.as_deref()),
            })
        })
        .collect();
    let digest = serde_json::to_string_pretty(&digest).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"You are a knowledgeable library assistant helping a user find a book to read.

You have access to the following books in our library:
{digest}

Your INSTRUCTIONS:
1. Recommend books from the provided list based on the user's interests, mood, or preferred plot/scenarios.
2. If a user asks for a recommendation, suggest 1-3 relevant books from the list.
3. Briefly explain WHY you are recommending each book based on their input.
4. If the user's request doesn't match any specific book well, suggest the closest matches or ask for more preferences.
5. Be friendly, helpful, and encouraging.
6. Format your response nicely (e.g., use bullet points for book titles).

Remember: You can ONLY recommend books that are in the provided list."#,
    )
}

/// First 100 characters of a description, marked as truncated
fn digest_description(description: Option<&str>) -> String {
    match description {
        None => "N/A".to_string(),
        Some(d) if d.chars().count() <= 100 => d.to_string(),
        Some(d) => {
            let head: String = d.chars().take(100).collect();
            format!("{}...", head)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::BookStatus;
    use chrono::Utc;
    use uuid::Uuid;

    fn book(title: &str, description: Option<&str>) -> Book {
        Book {
            id: Uuid::new_v4(),
            title: title.to_string(),
            author: "Ursula K. Le Guin".to_string(),
            isbn: "9780441007318".to_string(),
            genre: "Science Fiction".to_string(),
            publisher: None,
            publication_year: Some(1969),
            description: description.map(String::from),
            cover_url: None,
            status: BookStatus::Available,
            total_copies: 2,
            available_copies: 2,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_book_prompt_mentions_title_and_refusal() {
        let prompt = book_prompt(&book("The Left Hand of Darkness", None));
        assert!(prompt.contains("\"The Left Hand of Darkness\""));
        assert!(prompt.contains("politely refuse"));
        assert!(prompt.contains("- Description: N/A"));
        assert!(prompt.contains("- Year: 1969"));
    }

    #[test]
    fn test_recommendation_prompt_lists_books() {
        let books = vec![book("A Wizard of Earthsea", Some("A boy learns magic."))];
        let prompt = recommendation_prompt(&books);
        assert!(prompt.contains("A Wizard of Earthsea"));
        assert!(prompt.contains("ONLY recommend books"));
    }

    #[test]
    fn test_digest_description_truncates_long_text() {
        let long = "x".repeat(150);
        let digest = digest_description(Some(&long));
        assert_eq!(digest.chars().count(), 103);
        assert!(digest.ends_with("..."));

        assert_eq!(digest_description(Some("short")), "short");
        assert_eq!(digest_description(None), "N/A");
    }
}
