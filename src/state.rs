use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::{
    auth::jwt::JwtKeys,
    config::{AppConfig, StoreBackend},
    products::repo::{PgProductStore, ProductStore},
    store::MemoryStore,
    users::repo::{PgUserStore, UserStore},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
    pub users: Arc<dyn UserStore>,
    pub products: Arc<dyn ProductStore>,
}

impl AppState {
    /// Connect to the configured store. Fails if the database is unreachable
    /// or migrations cannot be applied.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        match config.store {
            StoreBackend::Memory => {
                info!("using in-memory store");
                Ok(Self::in_memory(config))
            }
            StoreBackend::Postgres => {
                let url = config
                    .database_url
                    .clone()
                    .context("DATABASE_URL is not set")?;
                let timeout = config.db_timeout();
                let db = PgPoolOptions::new()
                    .max_connections(config.db_max_connections)
                    .acquire_timeout(timeout)
                    .connect(&url)
                    .await
                    .context("connect to database")?;

                sqlx::migrate!("./migrations")
                    .run(&db)
                    .await
                    .context("run migrations")?;
                info!("database ready");

                let users = Arc::new(PgUserStore::new(db.clone(), timeout)) as Arc<dyn UserStore>;
                let products = Arc::new(PgProductStore::new(db, timeout)) as Arc<dyn ProductStore>;
                Ok(Self::from_parts(config, users, products))
            }
        }
    }

    pub fn in_memory(config: AppConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::from_parts(config, store.clone(), store)
    }

    pub fn from_parts(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        products: Arc<dyn ProductStore>,
    ) -> Self {
        let keys = JwtKeys::new(&config.jwt);
        Self {
            config: Arc::new(config),
            keys,
            users,
            products,
        }
    }
}
