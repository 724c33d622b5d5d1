use axum::{extract::{Path, State}, Json};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use medtrack_core::{
    errors::MedError,
    models::prescription::{CreatePrescriptionRequest, Prescription, UpdatePrescriptionRequest},
    models::schedule::{DateWindow, DoseSchedule},
};
use uuid::Uuid;

use crate::{middleware::{auth::CurrentUser, error_handling::AppError}, ApiState};

#[derive(Debug, Serialize)]
pub struct PrescriptionDetail {
    pub prescription: Prescription,
    pub schedules: Vec<DoseSchedule>,
}

#[axum::debug_handler]
pub async fn create_prescription(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<CreatePrescriptionRequest>,
) -> Result<Json<Prescription>, AppError> {
    DateWindow::new(payload.start_date, payload.end_date).ensure_ordered()?;

    // The medication must exist and belong to the caller.
    medtrack_db::repositories::medication::get_medication_by_id(
        &state.db_pool,
        user_id,
        payload.medication_id,
    )
    .await
    .map_err(MedError::Database)?
    .ok_or_else(|| {
        MedError::NotFound(format!("Medication with ID {} not found", payload.medication_id))
    })?;

    if let Some(provider_id) = payload.provider_id {
        medtrack_db::repositories::provider::get_provider_by_id(&state.db_pool, user_id, provider_id)
            .await
            .map_err(MedError::Database)?
            .ok_or_else(|| {
                MedError::NotFound(format!("Care provider with ID {} not found", provider_id))
            })?;
    }

    let prescription = medtrack_db::repositories::prescription::create_prescription(
        &state.db_pool,
        user_id,
        payload.medication_id,
        payload.provider_id,
        payload.as_needed,
        payload.dosage.as_deref(),
        payload.start_date,
        payload.end_date,
    )
    .await
    .map_err(MedError::Database)?;

    Ok(Json(prescription.into()))
}

#[axum::debug_handler]
pub async fn list_prescriptions(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<Prescription>>, AppError> {
    let prescriptions =
        medtrack_db::repositories::prescription::list_prescriptions(&state.db_pool, user_id)
            .await
            .map_err(MedError::Database)?;

    Ok(Json(prescriptions.into_iter().map(Into::into).collect()))
}

#[axum::debug_handler]
pub async fn get_prescription(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PrescriptionDetail>, AppError> {
    let prescription =
        medtrack_db::repositories::prescription::get_prescription_by_id(&state.db_pool, user_id, id)
            .await
            .map_err(MedError::Database)?
            .ok_or_else(|| MedError::NotFound(format!("Prescription with ID {} not found", id)))?;

    let schedules = medtrack_db::repositories::dose_schedule::list_schedules_by_prescription(
        &state.db_pool,
        id,
    )
    .await
    .map_err(MedError::Database)?
    .into_iter()
    .map(|row| row.into_core())
    .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(PrescriptionDetail {
        prescription: prescription.into(),
        schedules,
    }))
}

#[axum::debug_handler]
pub async fn update_prescription(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePrescriptionRequest>,
) -> Result<Json<Prescription>, AppError> {
    let existing =
        medtrack_db::repositories::prescription::get_prescription_by_id(&state.db_pool, user_id, id)
            .await
            .map_err(MedError::Database)?
            .ok_or_else(|| MedError::NotFound(format!("Prescription with ID {} not found", id)))?;

    // Validate the window as it will be after the merge.
    let merged_window = DateWindow::new(
        payload.start_date.or(existing.start_date),
        payload.end_date.or(existing.end_date),
    );
    merged_window.ensure_ordered()?;

    if let Some(provider_id) = payload.provider_id {
        medtrack_db::repositories::provider::get_provider_by_id(&state.db_pool, user_id, provider_id)
            .await
            .map_err(MedError::Database)?
            .ok_or_else(|| {
                MedError::NotFound(format!("Care provider with ID {} not found", provider_id))
            })?;
    }

    let prescription = medtrack_db::repositories::prescription::update_prescription(
        &state.db_pool,
        user_id,
        id,
        payload.provider_id,
        payload.as_needed,
        payload.dosage.as_deref(),
        payload.start_date,
        payload.end_date,
    )
    .await
    .map_err(MedError::Database)?
    .ok_or_else(|| MedError::NotFound(format!("Prescription with ID {} not found", id)))?;

    // A prescription switched to PRN or given a tighter window must not
    // keep stale pre-materialized doses; the next materializer run
    // regenerates whatever still applies.
    let became_prn = payload.as_needed == Some(true) && !existing.as_needed;
    let window_changed = payload.start_date.is_some() || payload.end_date.is_some();
    if became_prn || window_changed {
        medtrack_db::repositories::dose_log::delete_future_scheduled_for_prescription(
            &state.db_pool,
            id,
            Utc::now(),
        )
        .await
        .map_err(MedError::Database)?;
    }

    Ok(Json(prescription.into()))
}

#[axum::debug_handler]
pub async fn delete_prescription(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    // Ownership check before any cleanup touches dose history.
    medtrack_db::repositories::prescription::get_prescription_by_id(&state.db_pool, user_id, id)
        .await
        .map_err(MedError::Database)?
        .ok_or_else(|| MedError::NotFound(format!("Prescription with ID {} not found", id)))?;

    let deleted =
        medtrack_db::repositories::prescription::delete_prescription(&state.db_pool, user_id, id)
            .await
            .map_err(MedError::Database)?;

    Ok(Json(serde_json::json!({ "deleted": deleted })))
}
