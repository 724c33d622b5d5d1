use axum::{extract::{Path, State}, Json};
use std::sync::Arc;
use medtrack_core::{
    errors::MedError,
    models::provider::{CareProvider, CreateCareProviderRequest},
};
use uuid::Uuid;

use crate::{middleware::{auth::CurrentUser, error_handling::AppError}, ApiState};

#[axum::debug_handler]
pub async fn create_provider(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<CreateCareProviderRequest>,
) -> Result<Json<CareProvider>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError(MedError::Validation(
            "Provider name must not be empty".to_string(),
        )));
    }

    let provider = medtrack_db::repositories::provider::create_provider(
        &state.db_pool,
        user_id,
        payload.name.trim(),
        payload.specialty.as_deref(),
        payload.phone.as_deref(),
    )
    .await
    .map_err(MedError::Database)?;

    Ok(Json(provider.into()))
}

#[axum::debug_handler]
pub async fn list_providers(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<CareProvider>>, AppError> {
    let providers = medtrack_db::repositories::provider::list_providers(&state.db_pool, user_id)
        .await
        .map_err(MedError::Database)?;

    Ok(Json(providers.into_iter().map(Into::into).collect()))
}

#[axum::debug_handler]
pub async fn delete_provider(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = medtrack_db::repositories::provider::delete_provider(&state.db_pool, user_id, id)
        .await
        .map_err(MedError::Database)?;

    if !deleted {
        return Err(AppError(MedError::NotFound(format!(
            "Care provider with ID {} not found",
            id
        ))));
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}
