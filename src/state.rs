use sqlx::SqlitePool;

use crate::{config::Config, uploads::LocalStore};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub uploads: LocalStore,
}

impl AppState {
    pub fn new(db: SqlitePool, config: &Config) -> Self {
        Self {
            db,
            uploads: LocalStore::new(&config.upload_dir, &config.public_base_url),
        }
    }
}
