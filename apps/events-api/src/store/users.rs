use event_auth::{hash_password, verify_against_dummy, verify_password};
use sqlx::SqlitePool;

use super::{blocking, is_unique_violation, StoreError};
use crate::models::User;

/// Credential store backed by the `users` table
#[derive(Debug, Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a user and return its id
    ///
    /// `email` must already be normalized. Fails with `Conflict` when the
    /// address is taken.
    pub async fn create(&self, email: &str, password: &str) -> Result<i64, StoreError> {
        let password = password.to_owned();
        let password_hash = blocking(move || hash_password(&password)).await??;

        let result = sqlx::query("INSERT INTO users (email, password_hash) VALUES (?, ?)")
            .bind(email)
            .bind(&password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Conflict("A user with this email already exists".to_string())
                } else {
                    StoreError::Database(e)
                }
            })?;

        let id = result.last_insert_rowid();
        tracing::info!("Created user {}", id);

        Ok(id)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>("SELECT id, email, password_hash FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound("User not found".to_string()))
    }

    /// Look up `email` and check `password` against the stored hash
    ///
    /// An unknown email and a wrong password produce the same
    /// `InvalidCredentials` error, and both pay for one Argon2 verification.
    pub async fn validate_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<User, StoreError> {
        let user = match self.find_by_email(email).await {
            Ok(user) => user,
            Err(StoreError::NotFound(_)) => {
                let password = password.to_owned();
                blocking(move || verify_against_dummy(&password)).await?;
                return Err(StoreError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        let password = password.to_owned();
        let hash = user.password_hash.clone();
        let valid = blocking(move || verify_password(&password, &hash)).await?;

        if valid {
            Ok(user)
        } else {
            Err(StoreError::InvalidCredentials)
        }
    }
}
