use sqlx::{migrate::Migrator, pool::PoolOptions};
use std::path::Path;
use tracing::info;

pub mod categories;
pub mod issues;
pub mod models;
pub mod users;

/// Database connection pool wrapper
pub struct Database {
    pool: sqlx::Pool<sqlx::Postgres>,
}

impl Database {
    pub async fn connect(url: &str, max_conn: u32) -> Result<Self, anyhow::Error> {
        let pool = PoolOptions::<sqlx::Postgres>::new()
            .max_connections(max_conn)
            .connect(url)
            .await?;
        Ok(Database { pool })
    }

    pub async fn migrate(self, migrations_path: &str) -> Result<Self, anyhow::Error> {
        Migrator::new(Path::new(migrations_path))
            .await?
            .run(&self.pool)
            .await?;
        info!("Database migrations applied successfully");
        Ok(self)
    }

    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
