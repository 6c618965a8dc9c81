use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::api::ApiClient;
use crate::config::Config;
use crate::db;
use crate::session::{SessionManager, SqliteSessionStore};

pub type DbPool = Pool<SqliteConnectionManager>;

/// Everything a command needs, built once at startup and passed down.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub session: SessionManager,
    pub api: ApiClient,
}

impl AppState {
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let pool = match config.db_path() {
            Some(path) => db::create_pool(path)?,
            None => db::memory_pool()?,
        };
        db::run_migrations(&pool)?;

        let session = SessionManager::new(Arc::new(SqliteSessionStore::new(pool)));
        let api = ApiClient::new(&config.api, session.clone())?;

        Ok(Self {
            config,
            session,
            api,
        })
    }
}
