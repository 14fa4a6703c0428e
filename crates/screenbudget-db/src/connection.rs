use crate::error::{DbError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "screenbudget.db".to_string() }
    }
}

pub struct Database {
    pub pool: Option<Pool<Sqlite>>,
}

impl Database {
    pub async fn new(config: DatabaseConfig) -> Result<Self> {
        let pool = Self::create_pool(&config).await?;

        Ok(Self { pool: Some(pool) })
    }

    async fn create_pool(config: &DatabaseConfig) -> Result<Pool<Sqlite>> {
        let path = Path::new(&config.path);

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
                info!("Created database directory: {}", parent.display());
            }
        }

        // WAL plus a generous busy timeout: budget-day writes run in
        // IMMEDIATE transactions and concurrent writers must queue, not
        // fail.
        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", config.path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(10))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new().max_connections(5).connect_with(options).await?;

        info!("Database connection pool created: {}", config.path);

        Ok(pool)
    }

    pub fn pool(&self) -> Result<&Pool<Sqlite>> {
        self.pool
            .as_ref()
            .ok_or_else(|| DbError::InvalidData("Database pool not initialized".to_string()))
    }

    pub async fn close(mut self) {
        if let Some(pool) = self.pool.take() {
            pool.close().await;
            info!("Database connection pool closed");
        }
    }
}
