//! Field record store: the thin persistence boundary over PostgreSQL.
//!
//! Handlers depend on the [`FieldStore`] trait rather than on a pool so the
//! routing layer can be exercised against an in-memory stand-in. The
//! production implementation is [`PgFieldStore`]; `last_updated` is refreshed
//! on every write while `created_at` is set once on insert.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::models::{Field, NewField, SensorReadings};

// ---

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Read/write access to persisted [`Field`] records.
#[async_trait]
pub trait FieldStore: Send + Sync {
    /// Fetch a field by id; `None` if no such record exists.
    async fn get(&self, id: i64) -> Result<Option<Field>, StoreError>;

    /// Insert a new field with system-assigned timestamps.
    async fn create(&self, new: NewField) -> Result<Field, StoreError>;

    /// Overwrite the sensor snapshot of an existing field, refreshing
    /// `last_updated`. Returns `None` if the field does not exist.
    async fn update_readings(
        &self,
        id: i64,
        readings: SensorReadings,
    ) -> Result<Option<Field>, StoreError>;

    /// All fields, most recently updated first.
    async fn list(&self) -> Result<Vec<Field>, StoreError>;
}

/// PostgreSQL-backed store used in production.
pub struct PgFieldStore {
    pool: PgPool,
}

impl PgFieldStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FieldStore for PgFieldStore {
    async fn get(&self, id: i64) -> Result<Option<Field>, StoreError> {
        // ---
        let field = sqlx::query_as::<_, Field>(
            r#"
            SELECT id, name, location, area, crop_type,
                   moisture, temperature, humidity, soil_ph,
                   n_level, p_level, k_level,
                   last_updated, created_at
            FROM fields
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(field)
    }

    async fn create(&self, new: NewField) -> Result<Field, StoreError> {
        // ---
        let field = sqlx::query_as::<_, Field>(
            r#"
            INSERT INTO fields (
                name, location, area, crop_type,
                moisture, temperature, humidity, soil_ph,
                n_level, p_level, k_level
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, name, location, area, crop_type,
                      moisture, temperature, humidity, soil_ph,
                      n_level, p_level, k_level,
                      last_updated, created_at
            "#,
        )
        .bind(&new.name)
        .bind(&new.location)
        .bind(new.area)
        .bind(new.crop_type.as_str())
        .bind(new.readings.moisture)
        .bind(new.readings.temperature)
        .bind(new.readings.humidity)
        .bind(new.readings.soil_ph)
        .bind(new.readings.n_level)
        .bind(new.readings.p_level)
        .bind(new.readings.k_level)
        .fetch_one(&self.pool)
        .await?;

        Ok(field)
    }

    async fn update_readings(
        &self,
        id: i64,
        readings: SensorReadings,
    ) -> Result<Option<Field>, StoreError> {
        // ---
        let field = sqlx::query_as::<_, Field>(
            r#"
            UPDATE fields SET
                moisture = $2, temperature = $3, humidity = $4, soil_ph = $5,
                n_level = $6, p_level = $7, k_level = $8,
                last_updated = now()
            WHERE id = $1
            RETURNING id, name, location, area, crop_type,
                      moisture, temperature, humidity, soil_ph,
                      n_level, p_level, k_level,
                      last_updated, created_at
            "#,
        )
        .bind(id)
        .bind(readings.moisture)
        .bind(readings.temperature)
        .bind(readings.humidity)
        .bind(readings.soil_ph)
        .bind(readings.n_level)
        .bind(readings.p_level)
        .bind(readings.k_level)
        .fetch_optional(&self.pool)
        .await?;

        Ok(field)
    }

    async fn list(&self) -> Result<Vec<Field>, StoreError> {
        // ---
        let fields = sqlx::query_as::<_, Field>(
            r#"
            SELECT id, name, location, area, crop_type,
                   moisture, temperature, humidity, soil_ph,
                   n_level, p_level, k_level,
                   last_updated, created_at
            FROM fields
            ORDER BY last_updated DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(fields)
    }
}
