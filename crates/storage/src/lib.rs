pub mod error;
pub mod memory;
pub mod models;
pub mod repository;
pub mod store;

pub use error::{Result, StorageError};
pub use memory::MemoryStore;
pub use repository::PgSessionStore;
pub use store::SessionStore;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Postgres connection handle shared by the repositories.
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
