use crate::models::DbCareProvider;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_provider(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    name: &str,
    specialty: Option<&str>,
    phone: Option<&str>,
) -> Result<DbCareProvider> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating care provider: id={}, user_id={}, name={}", id, user_id, name);

    let provider = sqlx::query_as::<_, DbCareProvider>(
        r#"
        INSERT INTO care_providers (id, user_id, name, specialty, phone, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, user_id, name, specialty, phone, created_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(name)
    .bind(specialty)
    .bind(phone)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(provider)
}

pub async fn list_providers(pool: &Pool<Postgres>, user_id: Uuid) -> Result<Vec<DbCareProvider>> {
    let providers = sqlx::query_as::<_, DbCareProvider>(
        r#"
        SELECT id, user_id, name, specialty, phone, created_at
        FROM care_providers
        WHERE user_id = $1
        ORDER BY name
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(providers)
}

pub async fn get_provider_by_id(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    id: Uuid,
) -> Result<Option<DbCareProvider>> {
    let provider = sqlx::query_as::<_, DbCareProvider>(
        r#"
        SELECT id, user_id, name, specialty, phone, created_at
        FROM care_providers
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(provider)
}

pub async fn delete_provider(pool: &Pool<Postgres>, user_id: Uuid, id: Uuid) -> Result<bool> {
    tracing::debug!("Deleting care provider: id={}, user_id={}", id, user_id);

    let result = sqlx::query(
        r#"
        DELETE FROM care_providers
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
