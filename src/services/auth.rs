//! Authentication and account service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::profile::{Claims, Login, Profile, Register, UpdateProfile},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new account and return it with a session token
    pub async fn register(&self, request: Register) -> AppResult<(String, Profile)> {
        request.validate()?;

        if self.repository.profiles.email_exists(&request.email).await? {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let password_hash = self.hash_password(&request.password)?;
        let profile = self
            .repository
            .profiles
            .create(
                &request.email,
                &password_hash,
                &request.name,
                request.role.unwrap_or_default(),
            )
            .await?;

        let token = self.create_token(&profile)?;
        Ok((token, profile))
    }

    /// Authenticate by email and password and return a session token
    pub async fn login(&self, request: Login) -> AppResult<(String, Profile)> {
        let profile = self
            .repository
            .profiles
            .get_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !self.verify_password(&profile.password_hash, &request.password) {
            return Err(AppError::Authentication("Invalid email or password".to_string()));
        }

        let token = self.create_token(&profile)?;
        Ok((token, profile))
    }

    /// Profile for an authenticated user id
    pub async fn profile(&self, user_id: Uuid) -> AppResult<Profile> {
        self.repository.profiles.get_by_id(user_id).await
    }

    /// All profiles ordered by name
    pub async fn list_profiles(&self) -> AppResult<Vec<Profile>> {
        self.repository.profiles.list().await
    }

    /// Update a profile. Role checks happen at the handler layer.
    pub async fn update_profile(&self, id: Uuid, update: UpdateProfile) -> AppResult<Profile> {
        update.validate()?;
        self.repository.profiles.update(id, &update).await
    }

    /// Create a JWT for a profile
    pub fn create_token(&self, profile: &Profile) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = Claims {
            sub: profile.email.clone(),
            user_id: profile.id,
            role: profile.role,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    fn verify_password(&self, hash: &str, password: &str) -> bool {
        PasswordHash::new(hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}
