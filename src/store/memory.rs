use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::StoreError;
use crate::{
    products::{
        repo::ProductStore,
        repo_types::{NewProduct, Product},
    },
    users::{
        repo::UserStore,
        repo_types::{NewUser, User},
    },
};

/// Process-local store backing both users and products.
///
/// Email uniqueness is checked and the row inserted under one write lock,
/// which gives the same insert-if-absent guarantee as the unique index.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>,
    products: RwLock<Vec<Product>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let mut map = self.users.write().await;
        if map.contains_key(&user.email) {
            return Err(StoreError::DuplicateKey);
        }
        let row = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            image_url: None,
            created_at: OffsetDateTime::now_utc(),
        };
        map.insert(row.email.clone(), row.clone());
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn update_image_url(&self, email: &str, url: &str) -> Result<(), StoreError> {
        let mut map = self.users.write().await;
        let user = map.get_mut(email).ok_or(StoreError::NotFound)?;
        user.image_url = Some(url.to_string());
        Ok(())
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        let row = Product {
            id: Uuid::new_v4(),
            email: product.email,
            name: product.name,
            description: product.description,
            category: product.category,
            price: product.price,
            image_url: product.image_url,
            address: product.address,
            state: product.state,
            pincode: product.pincode,
            created_at: OffsetDateTime::now_utc(),
        };
        self.products.write().await.push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        Ok(self
            .products
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.products.read().await.clone())
    }

    async fn list_by_owner(&self, email: &str) -> Result<Vec<Product>, StoreError> {
        Ok(self
            .products
            .read()
            .await
            .iter()
            .filter(|p| p.email == email)
            .cloned()
            .collect())
    }
}
