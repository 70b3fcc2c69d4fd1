use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::{dto::MessageResponse, AuthUser},
    error::AppError,
    products::{
        dto::{AddProductRequest, ProductResponse, ProductsResponse},
        services,
    },
    state::AppState,
};

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/addproduct", post(add_product))
        .route("/getproducts", get(list_products))
        .route("/product/:id", get(get_product))
}

#[instrument(skip(state, payload))]
pub async fn add_product(
    State(state): State<AppState>,
    AuthUser(email): AuthUser,
    Json(payload): Json<AddProductRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    services::add_product(state.products.as_ref(), &email, payload).await?;
    Ok(Json(MessageResponse::new("Product added successfully")))
}

#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<ProductsResponse>, AppError> {
    let products = services::list_products(state.products.as_ref()).await?;
    Ok(Json(ProductsResponse { products }))
}

#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = services::get_product(state.products.as_ref(), id).await?;
    Ok(Json(ProductResponse { product }))
}
