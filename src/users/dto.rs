use serde::{Deserialize, Serialize};

use crate::{products::repo_types::Product, users::repo_types::User};

/// A user joined with the listings they own.
#[derive(Debug, Serialize)]
pub struct Profile {
    pub name: String,
    pub image_url: Option<String>,
    pub email: String,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: Profile,
}

#[derive(Debug, Serialize)]
pub struct SellerProfileResponse {
    pub data: Profile,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

#[derive(Debug, Deserialize)]
pub struct SellerQuery {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateImageRequest {
    #[serde(default)]
    pub image_url: String,
}
