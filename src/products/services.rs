use tracing::info;
use uuid::Uuid;

use crate::{
    error::AppError,
    products::{
        dto::AddProductRequest,
        repo::ProductStore,
        repo_types::{NewProduct, Product},
    },
};

/// Validate and store a listing owned by `owner_email`.
pub async fn add_product(
    products: &dyn ProductStore,
    owner_email: &str,
    req: AddProductRequest,
) -> Result<Product, AppError> {
    req.validate()?;
    let product = products
        .insert(NewProduct {
            email: owner_email.to_string(),
            name: req.name.trim().to_string(),
            description: req.description.trim().to_string(),
            category: req.category.trim().to_string(),
            price: req.price.unwrap_or_default(),
            image_url: req.image_url.trim().to_string(),
            address: req.address.trim().to_string(),
            state: req.state.trim().to_string(),
            pincode: req.pincode,
        })
        .await?;
    info!(product_id = %product.id, owner = %owner_email, "product added");
    Ok(product)
}

pub async fn list_products(products: &dyn ProductStore) -> Result<Vec<Product>, AppError> {
    Ok(products.list_all().await?)
}

pub async fn get_product(products: &dyn ProductStore, id: Uuid) -> Result<Product, AppError> {
    products.find_by_id(id).await?.ok_or(AppError::NotFound)
}
