use axum::{extract::{Path, State}, Json};
use std::sync::Arc;
use medtrack_core::{
    errors::MedError,
    models::medication::{CreateMedicationRequest, Medication, UpdateMedicationRequest},
};
use uuid::Uuid;

use crate::{middleware::{auth::CurrentUser, error_handling::AppError}, ApiState};

#[axum::debug_handler]
pub async fn create_medication(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<CreateMedicationRequest>,
) -> Result<Json<Medication>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError(MedError::Validation(
            "Medication name must not be empty".to_string(),
        )));
    }

    let medication = medtrack_db::repositories::medication::create_medication(
        &state.db_pool,
        user_id,
        payload.name.trim(),
        payload.strength.as_deref(),
        payload.form.as_deref(),
        payload.notes.as_deref(),
    )
    .await
    .map_err(MedError::Database)?;

    Ok(Json(medication.into()))
}

#[axum::debug_handler]
pub async fn list_medications(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<Medication>>, AppError> {
    let medications = medtrack_db::repositories::medication::list_medications(&state.db_pool, user_id)
        .await
        .map_err(MedError::Database)?;

    Ok(Json(medications.into_iter().map(Into::into).collect()))
}

#[axum::debug_handler]
pub async fn get_medication(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Medication>, AppError> {
    let medication =
        medtrack_db::repositories::medication::get_medication_by_id(&state.db_pool, user_id, id)
            .await
            .map_err(MedError::Database)?
            .ok_or_else(|| MedError::NotFound(format!("Medication with ID {} not found", id)))?;

    Ok(Json(medication.into()))
}

#[axum::debug_handler]
pub async fn update_medication(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMedicationRequest>,
) -> Result<Json<Medication>, AppError> {
    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            return Err(AppError(MedError::Validation(
                "Medication name must not be empty".to_string(),
            )));
        }
    }

    let medication = medtrack_db::repositories::medication::update_medication(
        &state.db_pool,
        user_id,
        id,
        payload.name.as_deref(),
        payload.strength.as_deref(),
        payload.form.as_deref(),
        payload.notes.as_deref(),
    )
    .await
    .map_err(MedError::Database)?
    .ok_or_else(|| MedError::NotFound(format!("Medication with ID {} not found", id)))?;

    Ok(Json(medication.into()))
}

#[axum::debug_handler]
pub async fn delete_medication(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = medtrack_db::repositories::medication::delete_medication(&state.db_pool, user_id, id)
        .await
        .map_err(MedError::Database)?;

    if !deleted {
        return Err(AppError(MedError::NotFound(format!(
            "Medication with ID {} not found",
            id
        ))));
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}
