use anyhow::{Context, Result};
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;
use tracing::info;

use crate::storage::repositories::AnimalRepository;
use crate::storage::traits::Connection;

/// DbConnection owns the SQLite pool. It is built once at startup and handed
/// to the services that need it.
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if needed) the database at `url` and set up the schema
    pub async fn new(url: &str) -> Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            info!("Creating database at {}", url);
            Sqlite::create_database(url)
                .await
                .with_context(|| format!("Failed to create database {}", url))?;
        }

        let pool = SqlitePool::connect(url)
            .await
            .with_context(|| format!("Failed to connect to {}", url))?;

        Self::from_pool(pool).await
    }

    /// Initialize a private in-memory database for tests.
    ///
    /// A single connection that never expires keeps the memory database alive
    /// for as long as the pool exists.
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
        use std::str::FromStr;

        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self> {
        Self::setup_schema(&pool).await?;
        Ok(Self { pool: Arc::new(pool) })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS animals (
                rec_num INTEGER PRIMARY KEY AUTOINCREMENT,
                animal_id TEXT NOT NULL,
                animal_type TEXT NOT NULL,
                breed TEXT NOT NULL,
                color TEXT NOT NULL,
                date_of_birth TEXT NOT NULL,
                date_of_outcome TEXT NOT NULL,
                name TEXT,
                outcome_subtype TEXT,
                outcome_type TEXT,
                sex_upon_outcome TEXT NOT NULL,
                location_lat REAL NOT NULL CHECK (location_lat BETWEEN -90 AND 90),
                location_long REAL NOT NULL CHECK (location_long BETWEEN -180 AND 180)
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_animals_animal_type
            ON animals(animal_type);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_animals_breed
            ON animals(breed);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

impl Connection for DbConnection {
    type AnimalRepository = AnimalRepository;

    fn create_animal_repository(&self) -> Self::AnimalRepository {
        AnimalRepository::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_schema_is_created() {
        let db = DbConnection::init_test().await.unwrap();
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'animals'",
        )
        .fetch_one(db.pool())
        .await
        .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_file_database_is_created_and_reopened() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("animals.db").display());

        let first = DbConnection::new(&url).await.unwrap();
        sqlx::query(
            "INSERT INTO animals (animal_id, animal_type, breed, color, date_of_birth, \
             date_of_outcome, sex_upon_outcome, location_lat, location_long) \
             VALUES ('A1', 'Dog', 'Beagle', 'Tan', '2020-01-01', '2020-06-01', 'Intact Male', 30.0, -97.0)",
        )
        .execute(first.pool())
        .await
        .unwrap();
        first.pool().close().await;

        let second = DbConnection::new(&url).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM animals")
            .fetch_one(second.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
