//! PostgreSQL database operations

pub mod entity;
#[cfg(test)]
pub mod memory;
pub mod progress;
pub mod store;
pub mod users;

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::error::{ApiError, Result};

pub use entity::Entity;
pub use store::ProgressStore;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a pool that only connects on first use
    pub fn connect_lazy(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_lazy(database_url)?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === Generic Entity Repository ===

    /// Get an entity by ID
    pub async fn get_one<E: Entity>(&self, id: i64) -> Result<E> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", E::COLUMNS, E::TABLE);
        sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found::<E>(id))
    }

    /// Get all entities in their natural order
    pub async fn get_all<E: Entity>(&self) -> Result<Vec<E>> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY {}",
            E::COLUMNS,
            E::TABLE,
            E::ORDER_BY
        );
        let rows = sqlx::query_as::<_, E>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Insert a new entity and return it
    pub async fn add_one<E: Entity>(&self, new: &E::Create) -> Result<E> {
        let row = E::bind_create(sqlx::query_as::<_, E>(E::INSERT), new)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    /// Apply a partial update; fields left as `None` keep their value
    pub async fn update_one<E: Entity>(&self, id: i64, changes: &E::Update) -> Result<E> {
        E::bind_update(sqlx::query_as::<_, E>(E::UPDATE).bind(id), changes)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found::<E>(id))
    }

    /// Delete an entity by ID, returning the ID
    pub async fn delete_one<E: Entity>(&self, id: i64) -> Result<i64> {
        let sql = format!("DELETE FROM {} WHERE id = $1", E::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(not_found::<E>(id));
        }
        Ok(id)
    }
}

fn not_found<E: Entity>(id: i64) -> ApiError {
    ApiError::NotFound(format!("{} with id={} was not found", E::NAME, id))
}
