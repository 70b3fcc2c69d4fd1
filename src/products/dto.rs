use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{error::AppError, products::repo_types::Product};

/// Request body for a new listing. Any owner email in the body is ignored;
/// the owner always comes from the authenticated session.
#[derive(Debug, Deserialize)]
pub struct AddProductRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub price: Option<f64>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub pincode: String,
}

fn is_http_url(url: &str) -> bool {
    lazy_static! {
        static ref URL_RE: Regex = Regex::new(r"^https?://[^\s/?#]+[^\s]*$").unwrap();
    }
    URL_RE.is_match(url)
}

impl AddProductRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let required = [
            ("name", &self.name),
            ("description", &self.description),
            ("category", &self.category),
            ("address", &self.address),
            ("state", &self.state),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{field} is required")));
            }
        }
        match self.price {
            Some(p) if p.is_finite() && p >= 0.0 => {}
            Some(_) => return Err(AppError::Validation("price must be zero or greater".into())),
            None => return Err(AppError::Validation("price is required".into())),
        }
        if !is_http_url(self.image_url.trim()) {
            return Err(AppError::Validation("image_url must be a valid URL".into()));
        }
        if self.pincode.chars().count() != 6 {
            return Err(AppError::Validation(
                "pincode must be exactly 6 characters".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub product: Product,
}
