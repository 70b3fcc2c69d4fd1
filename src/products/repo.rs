use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::products::repo_types::{NewProduct, Product};
use crate::store::{timed, StoreError};

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError>;
    async fn list_all(&self) -> Result<Vec<Product>, StoreError>;
    /// Products owned by `email`; empty when the owner has none.
    async fn list_by_owner(&self, email: &str) -> Result<Vec<Product>, StoreError>;
}

#[derive(Clone)]
pub struct PgProductStore {
    db: PgPool,
    timeout: Duration,
}

impl PgProductStore {
    pub fn new(db: PgPool, timeout: Duration) -> Self {
        Self { db, timeout }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn insert(&self, p: NewProduct) -> Result<Product, StoreError> {
        let query = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products
                (email, name, description, category, price, image_url, address, state, pincode)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, email, name, description, category, price, image_url,
                      address, state, pincode, created_at
            "#,
        )
        .bind(&p.email)
        .bind(&p.name)
        .bind(&p.description)
        .bind(&p.category)
        .bind(p.price)
        .bind(&p.image_url)
        .bind(&p.address)
        .bind(&p.state)
        .bind(&p.pincode)
        .fetch_one(&self.db);
        timed(self.timeout, query).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let query = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, email, name, description, category, price, image_url,
                   address, state, pincode, created_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db);
        timed(self.timeout, query).await
    }

    async fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        let query = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, email, name, description, category, price, image_url,
                   address, state, pincode, created_at
            FROM products
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db);
        timed(self.timeout, query).await
    }

    async fn list_by_owner(&self, email: &str) -> Result<Vec<Product>, StoreError> {
        let query = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, email, name, description, category, price, image_url,
                   address, state, pincode, created_at
            FROM products
            WHERE email = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(email)
        .fetch_all(&self.db);
        timed(self.timeout, query).await
    }
}
