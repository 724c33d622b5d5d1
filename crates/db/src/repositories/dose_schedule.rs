use crate::models::DbDoseSchedule;
use chrono::{NaiveDate, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

#[allow(clippy::too_many_arguments)]
pub async fn create_schedule(
    pool: &Pool<Postgres>,
    prescription_id: Uuid,
    timezone: &str,
    days_of_week: &[String],
    times: &[String],
    quantity: Option<f64>,
    unit: Option<&str>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<DbDoseSchedule> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating dose schedule: id={}, prescription_id={}, timezone={}, days={:?}, times={:?}",
        id, prescription_id, timezone, days_of_week, times
    );

    let schedule = sqlx::query_as::<_, DbDoseSchedule>(
        r#"
        INSERT INTO dose_schedules
            (id, prescription_id, timezone, days_of_week, times, quantity, unit, start_date, end_date, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id, prescription_id, timezone, days_of_week, times, quantity, unit, start_date, end_date, created_at
        "#,
    )
    .bind(id)
    .bind(prescription_id)
    .bind(timezone)
    .bind(days_of_week)
    .bind(times)
    .bind(quantity)
    .bind(unit)
    .bind(start_date)
    .bind(end_date)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(schedule)
}

/// Ownership-checked lookup: the schedule must hang off one of the
/// user's own prescriptions.
pub async fn get_schedule_for_user(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    id: Uuid,
) -> Result<Option<DbDoseSchedule>> {
    let schedule = sqlx::query_as::<_, DbDoseSchedule>(
        r#"
        SELECT s.id, s.prescription_id, s.timezone, s.days_of_week, s.times,
               s.quantity, s.unit, s.start_date, s.end_date, s.created_at
        FROM dose_schedules s
        JOIN prescriptions p ON p.id = s.prescription_id
        WHERE s.id = $1 AND p.user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(schedule)
}

pub async fn list_schedules_by_prescription(
    pool: &Pool<Postgres>,
    prescription_id: Uuid,
) -> Result<Vec<DbDoseSchedule>> {
    let schedules = sqlx::query_as::<_, DbDoseSchedule>(
        r#"
        SELECT id, prescription_id, timezone, days_of_week, times, quantity, unit, start_date, end_date, created_at
        FROM dose_schedules
        WHERE prescription_id = $1
        ORDER BY created_at
        "#,
    )
    .bind(prescription_id)
    .fetch_all(pool)
    .await?;

    Ok(schedules)
}

/// Every schedule across all of a user's prescriptions; the conflict
/// checker compares a candidate against this set.
pub async fn list_schedules_for_user(
    pool: &Pool<Postgres>,
    user_id: Uuid,
) -> Result<Vec<DbDoseSchedule>> {
    let schedules = sqlx::query_as::<_, DbDoseSchedule>(
        r#"
        SELECT s.id, s.prescription_id, s.timezone, s.days_of_week, s.times,
               s.quantity, s.unit, s.start_date, s.end_date, s.created_at
        FROM dose_schedules s
        JOIN prescriptions p ON p.id = s.prescription_id
        WHERE p.user_id = $1
        ORDER BY s.created_at
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(schedules)
}

#[allow(clippy::too_many_arguments)]
pub async fn update_schedule(
    pool: &Pool<Postgres>,
    id: Uuid,
    timezone: Option<&str>,
    days_of_week: Option<&[String]>,
    times: Option<&[String]>,
    quantity: Option<f64>,
    unit: Option<&str>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<Option<DbDoseSchedule>> {
    tracing::debug!("Updating dose schedule: id={}", id);

    let schedule = sqlx::query_as::<_, DbDoseSchedule>(
        r#"
        UPDATE dose_schedules
        SET timezone = COALESCE($2, timezone),
            days_of_week = COALESCE($3, days_of_week),
            times = COALESCE($4, times),
            quantity = COALESCE($5, quantity),
            unit = COALESCE($6, unit),
            start_date = COALESCE($7, start_date),
            end_date = COALESCE($8, end_date)
        WHERE id = $1
        RETURNING id, prescription_id, timezone, days_of_week, times, quantity, unit, start_date, end_date, created_at
        "#,
    )
    .bind(id)
    .bind(timezone)
    .bind(days_of_week)
    .bind(times)
    .bind(quantity)
    .bind(unit)
    .bind(start_date)
    .bind(end_date)
    .fetch_optional(pool)
    .await?;

    Ok(schedule)
}

pub async fn delete_schedule(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    tracing::debug!("Deleting dose schedule: id={}", id);

    let result = sqlx::query(
        r#"
        DELETE FROM dose_schedules
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
