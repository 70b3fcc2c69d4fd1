use axum::{
    extract::{Query, State},
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{dto::MessageResponse, AuthUser},
    error::AppError,
    state::AppState,
    users::{
        dto::{ProfileResponse, SellerProfileResponse, SellerQuery, UpdateImageRequest, UsersResponse},
        services,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/allusers", get(all_users))
        .route("/profile", get(profile))
        .route("/seller-profile", get(seller_profile))
        .route("/image", put(update_image))
}

#[instrument(skip(state))]
pub async fn all_users(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<UsersResponse>, AppError> {
    let users = services::all_users(state.users.as_ref()).await?;
    Ok(Json(UsersResponse { users }))
}

#[instrument(skip(state))]
pub async fn profile(
    State(state): State<AppState>,
    AuthUser(email): AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile =
        services::profile(state.users.as_ref(), state.products.as_ref(), &email).await?;
    Ok(Json(ProfileResponse { profile }))
}

#[instrument(skip(state))]
pub async fn seller_profile(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(q): Query<SellerQuery>,
) -> Result<Json<SellerProfileResponse>, AppError> {
    let data = services::seller_profile(
        state.users.as_ref(),
        state.products.as_ref(),
        q.email.as_deref(),
    )
    .await?;
    Ok(Json(SellerProfileResponse { data }))
}

#[instrument(skip(state, payload))]
pub async fn update_image(
    State(state): State<AppState>,
    AuthUser(email): AuthUser,
    Json(payload): Json<UpdateImageRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    services::update_image(state.users.as_ref(), &email, &payload.image_url).await?;
    Ok(Json(MessageResponse::new("User image updated successfully")))
}
