use crate::models::DbPrescription;
use chrono::{NaiveDate, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

#[allow(clippy::too_many_arguments)]
pub async fn create_prescription(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    medication_id: Uuid,
    provider_id: Option<Uuid>,
    as_needed: bool,
    dosage: Option<&str>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<DbPrescription> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating prescription: id={}, user_id={}, medication_id={}, as_needed={}",
        id, user_id, medication_id, as_needed
    );

    let prescription = sqlx::query_as::<_, DbPrescription>(
        r#"
        INSERT INTO prescriptions
            (id, user_id, medication_id, provider_id, as_needed, dosage, start_date, end_date, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, user_id, medication_id, provider_id, as_needed, dosage, start_date, end_date, created_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(medication_id)
    .bind(provider_id)
    .bind(as_needed)
    .bind(dosage)
    .bind(start_date)
    .bind(end_date)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(prescription)
}

pub async fn get_prescription_by_id(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    id: Uuid,
) -> Result<Option<DbPrescription>> {
    tracing::debug!("Getting prescription: id={}, user_id={}", id, user_id);

    let prescription = sqlx::query_as::<_, DbPrescription>(
        r#"
        SELECT id, user_id, medication_id, provider_id, as_needed, dosage, start_date, end_date, created_at
        FROM prescriptions
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(prescription)
}

pub async fn list_prescriptions(pool: &Pool<Postgres>, user_id: Uuid) -> Result<Vec<DbPrescription>> {
    let prescriptions = sqlx::query_as::<_, DbPrescription>(
        r#"
        SELECT id, user_id, medication_id, provider_id, as_needed, dosage, start_date, end_date, created_at
        FROM prescriptions
        WHERE user_id = $1
        ORDER BY created_at
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(prescriptions)
}

/// Prescriptions that can have doses materialized: everything except
/// PRN. Used by the materialization job across all users.
pub async fn list_schedulable_prescriptions(pool: &Pool<Postgres>) -> Result<Vec<DbPrescription>> {
    let prescriptions = sqlx::query_as::<_, DbPrescription>(
        r#"
        SELECT id, user_id, medication_id, provider_id, as_needed, dosage, start_date, end_date, created_at
        FROM prescriptions
        WHERE as_needed = FALSE
        ORDER BY created_at
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(prescriptions)
}

#[allow(clippy::too_many_arguments)]
pub async fn update_prescription(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    id: Uuid,
    provider_id: Option<Uuid>,
    as_needed: Option<bool>,
    dosage: Option<&str>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<Option<DbPrescription>> {
    tracing::debug!("Updating prescription: id={}, user_id={}", id, user_id);

    let prescription = sqlx::query_as::<_, DbPrescription>(
        r#"
        UPDATE prescriptions
        SET provider_id = COALESCE($3, provider_id),
            as_needed = COALESCE($4, as_needed),
            dosage = COALESCE($5, dosage),
            start_date = COALESCE($6, start_date),
            end_date = COALESCE($7, end_date)
        WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, medication_id, provider_id, as_needed, dosage, start_date, end_date, created_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(provider_id)
    .bind(as_needed)
    .bind(dosage)
    .bind(start_date)
    .bind(end_date)
    .fetch_optional(pool)
    .await?;

    Ok(prescription)
}

pub async fn delete_prescription(pool: &Pool<Postgres>, user_id: Uuid, id: Uuid) -> Result<bool> {
    tracing::debug!("Deleting prescription: id={}, user_id={}", id, user_id);

    let result = sqlx::query(
        r#"
        DELETE FROM prescriptions
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
