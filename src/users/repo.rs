use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::store::{timed, StoreError};
use crate::users::repo_types::{NewUser, User};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. Fails with `DuplicateKey` if the email is taken.
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn list_all(&self) -> Result<Vec<User>, StoreError>;
    /// Overwrite the profile image. Fails with `NotFound` if no user matches.
    async fn update_image_url(&self, email: &str, url: &str) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
    timeout: Duration,
}

impl PgUserStore {
    pub fn new(db: PgPool, timeout: Duration) -> Self {
        Self { db, timeout }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let query = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, image_url, created_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.db);
        timed(self.timeout, query).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let query = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, image_url, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db);
        timed(self.timeout, query).await
    }

    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        let query = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, image_url, created_at
            FROM users
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.db);
        timed(self.timeout, query).await
    }

    async fn update_image_url(&self, email: &str, url: &str) -> Result<(), StoreError> {
        let query = sqlx::query(r#"UPDATE users SET image_url = $2 WHERE email = $1"#)
            .bind(email)
            .bind(url)
            .execute(&self.db);
        let done = timed(self.timeout, query).await?;
        if done.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
