use tracing::info;

use crate::{
    auth::services::normalize_email,
    error::AppError,
    products::repo::ProductStore,
    store::StoreError,
    users::{dto::Profile, repo::UserStore, repo_types::User},
};

/// Build the profile view for `email`: the user plus every product they own.
pub async fn profile(
    users: &dyn UserStore,
    products: &dyn ProductStore,
    email: &str,
) -> Result<Profile, AppError> {
    let user = users.find_by_email(email).await?.ok_or(AppError::NotFound)?;
    let products = products.list_by_owner(&user.email).await?;
    Ok(Profile {
        name: user.name,
        image_url: user.image_url,
        email: user.email,
        products,
    })
}

/// Public profile of another seller, looked up by an email query value.
pub async fn seller_profile(
    users: &dyn UserStore,
    products: &dyn ProductStore,
    email: Option<&str>,
) -> Result<Profile, AppError> {
    let email = email.map(normalize_email).unwrap_or_default();
    if email.is_empty() {
        return Err(AppError::Validation("email is required".into()));
    }
    profile(users, products, &email).await
}

pub async fn all_users(users: &dyn UserStore) -> Result<Vec<User>, AppError> {
    Ok(users.list_all().await?)
}

pub async fn update_image(users: &dyn UserStore, email: &str, url: &str) -> Result<(), AppError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(AppError::InvalidInput("image_url is required".into()));
    }
    users
        .update_image_url(email, url)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => AppError::NotFound,
            other => AppError::Storage(other),
        })?;
    info!(email = %email, "profile image updated");
    Ok(())
}
