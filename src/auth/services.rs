use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::{
    auth::{
        dto::{LoginRequest, SignupRequest},
        password::{hash_password, verify_password},
    },
    error::AppError,
    store::StoreError,
    users::{
        repo::UserStore,
        repo_types::{NewUser, User},
    },
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Register a new user. Uniqueness is decided by the store's insert alone.
pub async fn signup(users: &dyn UserStore, req: SignupRequest) -> Result<User, AppError> {
    let name = req.name.trim().to_string();
    let email = normalize_email(&req.email);
    if name.is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    if !is_valid_email(&email) {
        return Err(AppError::Validation("a valid email is required".into()));
    }
    if req.password.is_empty() {
        return Err(AppError::Validation("password is required".into()));
    }

    let password_hash = hash_password(&req.password)?;
    let user = users
        .insert(NewUser {
            name,
            email,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            StoreError::DuplicateKey => {
                warn!("signup for already registered email");
                AppError::AlreadyExists
            }
            other => AppError::Storage(other),
        })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user)
}

/// Check credentials. Unknown email and wrong password fail the same way.
pub async fn login(users: &dyn UserStore, req: LoginRequest) -> Result<User, AppError> {
    let email = normalize_email(&req.email);
    if !is_valid_email(&email) || req.password.is_empty() {
        return Err(AppError::Validation("email and password are required".into()));
    }

    let Some(user) = users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(&req.password, &user.password_hash) {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    info!(user_id = %user.id, "user logged in");
    Ok(user)
}
