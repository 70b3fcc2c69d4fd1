use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, MessageResponse, SignupRequest},
        jwt::JwtKeys,
        services,
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    services::signup(state.users.as_ref(), payload).await?;
    Ok(Json(MessageResponse::new("User registered successfully")))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = services::login(state.users.as_ref(), payload).await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.issue(&user.email)?;
    let products = state.products.list_by_owner(&user.email).await?;

    Ok(Json(LoginResponse {
        user,
        products,
        token,
    }))
}
