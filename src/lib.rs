//! Athenaeum Library Management System
//!
//! A Rust implementation of the Athenaeum library server, providing a REST
//! JSON API for catalog browsing, book circulation, user accounts, and an
//! LLM-backed reading assistant.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
