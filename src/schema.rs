//! Database schema management for `agrisense-backend`.
//!
//! Ensures required tables and indexes exist before serving requests.
//! Applied once on startup from `main.rs` (EMBP: single gateway call).

use anyhow::Result;
use sqlx::PgPool;

// ---

/// Create or update the database schema (idempotent).
///
/// Creates the `fields` table holding each field's metadata and latest
/// sensor snapshot. Safe to call on every startup; no-op if objects
/// already exist.
///
/// Errors are propagated if any SQL execution fails.
pub async fn create_schema(pool: &PgPool) -> Result<()> {
    // ---
    let mut tx = pool.begin().await?;

    // Core table served by `/sensor-data/{field_id}/`
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS fields (
            id           BIGSERIAL PRIMARY KEY,
            name         TEXT             NOT NULL,
            location     TEXT             NOT NULL DEFAULT '',
            area         DOUBLE PRECISION NOT NULL DEFAULT 1.0,
            crop_type    TEXT             NOT NULL DEFAULT 'other',
            moisture     DOUBLE PRECISION NOT NULL,
            temperature  DOUBLE PRECISION NOT NULL,
            humidity     DOUBLE PRECISION NOT NULL,
            soil_ph      DOUBLE PRECISION NOT NULL,
            n_level      DOUBLE PRECISION NOT NULL,
            p_level      DOUBLE PRECISION NOT NULL,
            k_level      DOUBLE PRECISION NOT NULL,
            last_updated TIMESTAMPTZ      NOT NULL DEFAULT now(),
            created_at   TIMESTAMPTZ      NOT NULL DEFAULT now()
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Default listing order is most-recently-updated first
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_fields_last_updated
            ON fields (last_updated DESC);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
