use crate::models::DbUserSettings;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_settings(pool: &Pool<Postgres>, user_id: Uuid) -> Result<Option<DbUserSettings>> {
    let settings = sqlx::query_as::<_, DbUserSettings>(
        r#"
        SELECT user_id, timezone, time_format, default_channels, updated_at
        FROM user_settings
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(settings)
}

pub async fn upsert_settings(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    timezone: &str,
    time_format: &str,
    default_channels: &[String],
) -> Result<DbUserSettings> {
    let now = Utc::now();

    tracing::debug!("Upserting settings: user_id={}, timezone={}", user_id, timezone);

    let settings = sqlx::query_as::<_, DbUserSettings>(
        r#"
        INSERT INTO user_settings (user_id, timezone, time_format, default_channels, updated_at)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id) DO UPDATE
        SET timezone = EXCLUDED.timezone,
            time_format = EXCLUDED.time_format,
            default_channels = EXCLUDED.default_channels,
            updated_at = EXCLUDED.updated_at
        RETURNING user_id, timezone, time_format, default_channels, updated_at
        "#,
    )
    .bind(user_id)
    .bind(timezone)
    .bind(time_format)
    .bind(default_channels)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(settings)
}
