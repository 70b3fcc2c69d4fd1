//! Classifieds marketplace backend: signup, login, bearer-token gated
//! product listings and seller profiles.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod products;
pub mod state;
pub mod store;
pub mod users;
