use crate::models::DbNotificationLog;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn record_notification(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    dose_log_id: Uuid,
    channel: &str,
    status: &str,
) -> Result<DbNotificationLog> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Recording notification: dose_log_id={}, channel={}, status={}",
        dose_log_id, channel, status
    );

    let log = sqlx::query_as::<_, DbNotificationLog>(
        r#"
        INSERT INTO notification_logs (id, user_id, dose_log_id, channel, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, user_id, dose_log_id, channel, status, created_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(dose_log_id)
    .bind(channel)
    .bind(status)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(log)
}

/// The per-dose at-most-once guard, re-checkable outside the candidate
/// query.
pub async fn has_sent_notification(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    dose_log_id: Uuid,
) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM notification_logs
            WHERE user_id = $1 AND dose_log_id = $2 AND status = 'SENT'
        )
        "#,
    )
    .bind(user_id)
    .bind(dose_log_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}
