use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Product listing. `email` is the owner's email.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub image_url: String,
    pub address: String,
    pub state: String,
    pub pincode: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub email: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub image_url: String,
    pub address: String,
    pub state: String,
    pub pincode: String,
}
