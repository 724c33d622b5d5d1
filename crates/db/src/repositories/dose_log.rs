use crate::models::{DbDoseLog, DbReminderCandidate};
use chrono::{DateTime, Utc};
use eyre::Result;
use medtrack_core::models::dose::DoseQuery;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const DOSE_COLUMNS: &str =
    "id, prescription_id, schedule_id, scheduled_for, status, taken_at, quantity, unit, created_at";

/// Outcome of one idempotent insert attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Created,
    AlreadyExists,
}

/// Insert a SCHEDULED dose instance, deferring to the partial unique
/// index on (prescription_id, schedule_id, scheduled_for). A row already
/// present at that key, under any status, wins: `ON CONFLICT DO NOTHING`
/// turns the race into `AlreadyExists` instead of an error, and never
/// overwrites a TAKEN/SKIPPED/MISSED record.
pub async fn insert_scheduled_dose(
    pool: &Pool<Postgres>,
    prescription_id: Uuid,
    schedule_id: Uuid,
    scheduled_for: DateTime<Utc>,
    quantity: Option<f64>,
    unit: Option<&str>,
) -> Result<InsertOutcome> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let inserted = sqlx::query(
        r#"
        INSERT INTO dose_logs
            (id, prescription_id, schedule_id, scheduled_for, status, quantity, unit, created_at)
        VALUES ($1, $2, $3, $4, 'SCHEDULED', $5, $6, $7)
        ON CONFLICT (prescription_id, schedule_id, scheduled_for)
            WHERE schedule_id IS NOT NULL
            DO NOTHING
        "#,
    )
    .bind(id)
    .bind(prescription_id)
    .bind(schedule_id)
    .bind(scheduled_for)
    .bind(quantity)
    .bind(unit)
    .bind(now)
    .execute(pool)
    .await?;

    if inserted.rows_affected() > 0 {
        Ok(InsertOutcome::Created)
    } else {
        tracing::debug!(
            "Dose instance already exists: prescription_id={}, schedule_id={}, scheduled_for={}",
            prescription_id, schedule_id, scheduled_for
        );
        Ok(InsertOutcome::AlreadyExists)
    }
}

/// Manual or PRN dose entry; no schedule reference, so the uniqueness
/// guard does not apply.
#[allow(clippy::too_many_arguments)]
pub async fn create_manual_dose(
    pool: &Pool<Postgres>,
    prescription_id: Uuid,
    scheduled_for: DateTime<Utc>,
    status: &str,
    taken_at: Option<DateTime<Utc>>,
    quantity: Option<f64>,
    unit: Option<&str>,
) -> Result<DbDoseLog> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating manual dose: id={}, prescription_id={}, status={}",
        id, prescription_id, status
    );

    let dose = sqlx::query_as::<_, DbDoseLog>(&format!(
        r#"
        INSERT INTO dose_logs
            (id, prescription_id, schedule_id, scheduled_for, status, taken_at, quantity, unit, created_at)
        VALUES ($1, $2, NULL, $3, $4, $5, $6, $7, $8)
        RETURNING {DOSE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(prescription_id)
    .bind(scheduled_for)
    .bind(status)
    .bind(taken_at)
    .bind(quantity)
    .bind(unit)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(dose)
}

/// Ownership-checked lookup: a dose belonging to another user's
/// prescription comes back as None, indistinguishable from absence.
pub async fn get_dose_for_user(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    id: Uuid,
) -> Result<Option<DbDoseLog>> {
    let dose = sqlx::query_as::<_, DbDoseLog>(
        r#"
        SELECT d.id, d.prescription_id, d.schedule_id, d.scheduled_for, d.status,
               d.taken_at, d.quantity, d.unit, d.created_at
        FROM dose_logs d
        JOIN prescriptions p ON p.id = d.prescription_id
        WHERE d.id = $1 AND p.user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(dose)
}

/// Typed dose listing; every filter on [`DoseQuery`] is optional and
/// applied in SQL.
pub async fn list_doses(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    query: &DoseQuery,
) -> Result<Vec<DbDoseLog>> {
    let doses = sqlx::query_as::<_, DbDoseLog>(
        r#"
        SELECT d.id, d.prescription_id, d.schedule_id, d.scheduled_for, d.status,
               d.taken_at, d.quantity, d.unit, d.created_at
        FROM dose_logs d
        JOIN prescriptions p ON p.id = d.prescription_id
        WHERE p.user_id = $1
          AND ($2::uuid[] IS NULL OR d.prescription_id = ANY($2))
          AND ($3::timestamptz IS NULL OR d.scheduled_for >= $3)
          AND ($4::timestamptz IS NULL OR d.scheduled_for <= $4)
          AND ($5::varchar IS NULL OR d.status = $5)
        ORDER BY d.scheduled_for
        "#,
    )
    .bind(user_id)
    .bind(query.prescription_ids.as_deref())
    .bind(query.from)
    .bind(query.to)
    .bind(query.status.map(|status| status.to_string()))
    .fetch_all(pool)
    .await?;

    Ok(doses)
}

/// Full-field update after the state machine has validated the edit.
pub async fn save_dose(pool: &Pool<Postgres>, dose: &DbDoseLog) -> Result<DbDoseLog> {
    tracing::debug!("Saving dose: id={}, status={}", dose.id, dose.status);

    let saved = sqlx::query_as::<_, DbDoseLog>(&format!(
        r#"
        UPDATE dose_logs
        SET scheduled_for = $2, status = $3, taken_at = $4, quantity = $5, unit = $6
        WHERE id = $1
        RETURNING {DOSE_COLUMNS}
        "#
    ))
    .bind(dose.id)
    .bind(dose.scheduled_for)
    .bind(&dose.status)
    .bind(dose.taken_at)
    .bind(dose.quantity)
    .bind(&dose.unit)
    .fetch_one(pool)
    .await?;

    Ok(saved)
}

/// Users who currently have past-due SCHEDULED doses; the sweep
/// evaluates each one under that user's timezone.
pub async fn list_users_with_due_doses(
    pool: &Pool<Postgres>,
    now: DateTime<Utc>,
) -> Result<Vec<Uuid>> {
    let user_ids = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT DISTINCT p.user_id
        FROM dose_logs d
        JOIN prescriptions p ON p.id = d.prescription_id
        WHERE d.status = 'SCHEDULED' AND d.scheduled_for < $1
        "#,
    )
    .bind(now)
    .fetch_all(pool)
    .await?;

    Ok(user_ids)
}

pub async fn list_due_scheduled_for_user(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Vec<DbDoseLog>> {
    let doses = sqlx::query_as::<_, DbDoseLog>(
        r#"
        SELECT d.id, d.prescription_id, d.schedule_id, d.scheduled_for, d.status,
               d.taken_at, d.quantity, d.unit, d.created_at
        FROM dose_logs d
        JOIN prescriptions p ON p.id = d.prescription_id
        WHERE p.user_id = $1 AND d.status = 'SCHEDULED' AND d.scheduled_for < $2
        ORDER BY d.scheduled_for
        "#,
    )
    .bind(user_id)
    .bind(now)
    .fetch_all(pool)
    .await?;

    Ok(doses)
}

/// Status-guarded missed transition; the guard keeps the sweep
/// idempotent when a take races it.
pub async fn mark_dose_missed(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE dose_logs
        SET status = 'MISSED'
        WHERE id = $1 AND status = 'SCHEDULED'
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Roll a schedule edit forward onto not-yet-due instances. Only future
/// SCHEDULED rows change; history keeps its snapshot.
pub async fn update_future_scheduled(
    pool: &Pool<Postgres>,
    schedule_id: Uuid,
    quantity: Option<f64>,
    unit: Option<&str>,
    now: DateTime<Utc>,
) -> Result<u64> {
    tracing::debug!("Bulk-updating future doses: schedule_id={}", schedule_id);

    let result = sqlx::query(
        r#"
        UPDATE dose_logs
        SET quantity = COALESCE($2, quantity), unit = COALESCE($3, unit)
        WHERE schedule_id = $1 AND status = 'SCHEDULED' AND scheduled_for >= $4
        "#,
    )
    .bind(schedule_id)
    .bind(quantity)
    .bind(unit)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Cleanup when a schedule goes away or its window shrinks: future
/// SCHEDULED instances are deleted, history is untouched.
pub async fn delete_future_scheduled(
    pool: &Pool<Postgres>,
    schedule_id: Uuid,
    now: DateTime<Utc>,
) -> Result<u64> {
    tracing::debug!("Deleting future scheduled doses: schedule_id={}", schedule_id);

    let result = sqlx::query(
        r#"
        DELETE FROM dose_logs
        WHERE schedule_id = $1 AND status = 'SCHEDULED' AND scheduled_for >= $2
        "#,
    )
    .bind(schedule_id)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn delete_future_scheduled_for_prescription(
    pool: &Pool<Postgres>,
    prescription_id: Uuid,
    now: DateTime<Utc>,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM dose_logs
        WHERE prescription_id = $1 AND status = 'SCHEDULED' AND scheduled_for >= $2
        "#,
    )
    .bind(prescription_id)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// SCHEDULED doses entering the send window that have no SENT
/// notification yet. The NOT EXISTS clause is the per-dose at-most-once
/// reminder guard.
pub async fn list_reminder_candidates(
    pool: &Pool<Postgres>,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<DbReminderCandidate>> {
    let candidates = sqlx::query_as::<_, DbReminderCandidate>(
        r#"
        SELECT d.id AS dose_log_id, p.user_id, d.prescription_id, d.scheduled_for,
               d.quantity, d.unit, m.name AS medication_name
        FROM dose_logs d
        JOIN prescriptions p ON p.id = d.prescription_id
        JOIN medications m ON m.id = p.medication_id
        WHERE d.status = 'SCHEDULED'
          AND d.scheduled_for >= $1
          AND d.scheduled_for <= $2
          AND NOT EXISTS (
              SELECT 1 FROM notification_logs nl
              WHERE nl.dose_log_id = d.id AND nl.status = 'SENT'
          )
        ORDER BY d.scheduled_for
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(candidates)
}
