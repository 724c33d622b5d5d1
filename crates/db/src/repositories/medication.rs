use crate::models::DbMedication;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_medication(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    name: &str,
    strength: Option<&str>,
    form: Option<&str>,
    notes: Option<&str>,
) -> Result<DbMedication> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating medication: id={}, user_id={}, name={}", id, user_id, name);

    let medication = sqlx::query_as::<_, DbMedication>(
        r#"
        INSERT INTO medications (id, user_id, name, strength, form, notes, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, user_id, name, strength, form, notes, created_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(name)
    .bind(strength)
    .bind(form)
    .bind(notes)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(medication)
}

pub async fn get_medication_by_id(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    id: Uuid,
) -> Result<Option<DbMedication>> {
    tracing::debug!("Getting medication: id={}, user_id={}", id, user_id);

    let medication = sqlx::query_as::<_, DbMedication>(
        r#"
        SELECT id, user_id, name, strength, form, notes, created_at
        FROM medications
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(medication)
}

pub async fn list_medications(pool: &Pool<Postgres>, user_id: Uuid) -> Result<Vec<DbMedication>> {
    let medications = sqlx::query_as::<_, DbMedication>(
        r#"
        SELECT id, user_id, name, strength, form, notes, created_at
        FROM medications
        WHERE user_id = $1
        ORDER BY name
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(medications)
}

pub async fn update_medication(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    id: Uuid,
    name: Option<&str>,
    strength: Option<&str>,
    form: Option<&str>,
    notes: Option<&str>,
) -> Result<Option<DbMedication>> {
    tracing::debug!("Updating medication: id={}, user_id={}", id, user_id);

    let medication = sqlx::query_as::<_, DbMedication>(
        r#"
        UPDATE medications
        SET name = COALESCE($3, name),
            strength = COALESCE($4, strength),
            form = COALESCE($5, form),
            notes = COALESCE($6, notes)
        WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, name, strength, form, notes, created_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(name)
    .bind(strength)
    .bind(form)
    .bind(notes)
    .fetch_optional(pool)
    .await?;

    Ok(medication)
}

pub async fn delete_medication(pool: &Pool<Postgres>, user_id: Uuid, id: Uuid) -> Result<bool> {
    tracing::debug!("Deleting medication: id={}, user_id={}", id, user_id);

    let result = sqlx::query(
        r#"
        DELETE FROM medications
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
