//! Business logic services

pub mod auth;
pub mod catalog;
pub mod chat;
pub mod circulation;
pub mod email;
pub mod stats;

use crate::{
    config::{AuthConfig, ChatConfig, EmailConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub circulation: circulation::CirculationService,
    pub chat: chat::ChatService,
    pub email: email::EmailService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        email_config: EmailConfig,
        chat_config: ChatConfig,
    ) -> Self {
        let email = email::EmailService::new(email_config);
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            catalog: catalog::CatalogService::new(repository.clone()),
            circulation: circulation::CirculationService::new(repository.clone(), email.clone()),
            chat: chat::ChatService::new(chat_config),
            stats: stats::StatsService::new(repository),
            email,
        }
    }
}
