//! Profiles repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::profile::{Profile, Role, UpdateProfile},
};

#[derive(Clone)]
pub struct ProfilesRepository {
    pool: Pool<Postgres>,
}

impl ProfilesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get profile by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Profile> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Get profile by email (primary authentication method)
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            "SELECT * FROM profiles WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Check if email already exists
    pub async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM profiles WHERE LOWER(email) = LOWER($1))")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// All profiles ordered by name
    pub async fn list(&self) -> AppResult<Vec<Profile>> {
        let profiles = sqlx::query_as::<_, Profile>("SELECT * FROM profiles ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(profiles)
    }

    /// Create a new profile
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
        role: Role,
    ) -> AppResult<Profile> {
        let created = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (email, password_hash, name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update a profile (partial). Unset fields keep their current value.
    pub async fn update(&self, id: Uuid, update: &UpdateProfile) -> AppResult<Profile> {
        let current = self.get_by_id(id).await?;

        let updated = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET name = $1, phone = $2, address = $3, role = $4
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(update.name.as_ref().unwrap_or(&current.name))
        .bind(update.phone.as_ref().or(current.phone.as_ref()))
        .bind(update.address.as_ref().or(current.address.as_ref()))
        .bind(update.role.unwrap_or(current.role))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Count all profiles
    pub async fn count_total(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
