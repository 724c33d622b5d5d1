use crate::models::DbInventory;
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Ownership goes through the medication row; another user's inventory
/// is indistinguishable from a missing one.
pub async fn get_inventory(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    medication_id: Uuid,
) -> Result<Option<DbInventory>> {
    let inventory = sqlx::query_as::<_, DbInventory>(
        r#"
        SELECT i.medication_id, i.current_qty, i.unit, i.low_threshold, i.last_restocked_at, i.updated_at
        FROM inventories i
        JOIN medications m ON m.id = i.medication_id
        WHERE i.medication_id = $1 AND m.user_id = $2
        "#,
    )
    .bind(medication_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(inventory)
}

/// Single upsert-style write; concurrent restocks are serialized by the
/// row lock, last write wins.
pub async fn upsert_inventory(
    pool: &Pool<Postgres>,
    medication_id: Uuid,
    current_qty: f64,
    unit: Option<&str>,
    low_threshold: Option<f64>,
    last_restocked_at: Option<DateTime<Utc>>,
) -> Result<DbInventory> {
    let now = Utc::now();

    tracing::debug!(
        "Upserting inventory: medication_id={}, current_qty={}",
        medication_id, current_qty
    );

    let inventory = sqlx::query_as::<_, DbInventory>(
        r#"
        INSERT INTO inventories (medication_id, current_qty, unit, low_threshold, last_restocked_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (medication_id) DO UPDATE
        SET current_qty = EXCLUDED.current_qty,
            unit = EXCLUDED.unit,
            low_threshold = EXCLUDED.low_threshold,
            last_restocked_at = EXCLUDED.last_restocked_at,
            updated_at = EXCLUDED.updated_at
        RETURNING medication_id, current_qty, unit, low_threshold, last_restocked_at, updated_at
        "#,
    )
    .bind(medication_id)
    .bind(current_qty)
    .bind(unit)
    .bind(low_threshold)
    .bind(last_restocked_at)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(inventory)
}

pub async fn list_low_stock(pool: &Pool<Postgres>, user_id: Uuid) -> Result<Vec<DbInventory>> {
    let inventories = sqlx::query_as::<_, DbInventory>(
        r#"
        SELECT i.medication_id, i.current_qty, i.unit, i.low_threshold, i.last_restocked_at, i.updated_at
        FROM inventories i
        JOIN medications m ON m.id = i.medication_id
        WHERE m.user_id = $1
          AND i.low_threshold IS NOT NULL
          AND i.current_qty <= i.low_threshold
        ORDER BY m.name
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(inventories)
}
