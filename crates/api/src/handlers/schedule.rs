use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{extract::{Path, State}, Json};
use chrono::Utc;
use medtrack_core::{
    conflict::check_conflicts,
    errors::{MedError, MedResult},
    models::schedule::{
        ApplyToUpcomingRequest, CreateDoseScheduleRequest, DateWindow, DoseSchedule,
        DoseScheduleResponse, UpdateDoseScheduleRequest,
    },
    time::{format_time_of_day, parse_time_of_day, parse_zone},
};
use uuid::Uuid;

use crate::{middleware::{auth::CurrentUser, error_handling::AppError}, ApiState};

/// Schedule input after validation: zone recognized, times strictly
/// `HH:mm`, days and times deduplicated, window ordered.
#[derive(Debug, Clone)]
pub struct NormalizedScheduleInput {
    pub timezone: String,
    pub days_of_week: Vec<String>,
    pub times: Vec<String>,
}

pub fn validate_schedule_input(payload: &CreateDoseScheduleRequest) -> MedResult<NormalizedScheduleInput> {
    parse_zone(&payload.timezone)?;

    let days_of_week: BTreeSet<_> = payload.days_of_week.iter().copied().collect();
    let times: BTreeSet<_> = payload
        .times
        .iter()
        .map(|time| parse_time_of_day(time))
        .collect::<MedResult<_>>()?;

    if let Some(quantity) = payload.quantity {
        medtrack_core::adherence::ensure_valid_quantity(quantity)?;
    }
    DateWindow::new(payload.start_date, payload.end_date).ensure_ordered()?;

    Ok(NormalizedScheduleInput {
        timezone: payload.timezone.clone(),
        days_of_week: days_of_week.into_iter().map(|day| day.to_string()).collect(),
        times: times.into_iter().map(format_time_of_day).collect(),
    })
}

/// Conflict report for a schedule against the rest of the user's
/// schedules, skipping any rows whose stored data no longer parses.
async fn conflicts_for(
    state: &ApiState,
    user_id: Uuid,
    candidate: &DoseSchedule,
) -> Result<Vec<medtrack_core::models::schedule::ScheduleConflict>, AppError> {
    let existing = medtrack_db::repositories::dose_schedule::list_schedules_for_user(
        &state.db_pool,
        user_id,
    )
    .await
    .map_err(MedError::Database)?
    .into_iter()
    .filter_map(|row| row.into_core().ok())
    .collect::<Vec<_>>();

    Ok(check_conflicts(candidate, &existing))
}

#[axum::debug_handler]
pub async fn create_schedule(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Path(prescription_id): Path<Uuid>,
    Json(payload): Json<CreateDoseScheduleRequest>,
) -> Result<Json<DoseScheduleResponse>, AppError> {
    // The prescription must exist and belong to the caller.
    medtrack_db::repositories::prescription::get_prescription_by_id(
        &state.db_pool,
        user_id,
        prescription_id,
    )
    .await
    .map_err(MedError::Database)?
    .ok_or_else(|| {
        MedError::NotFound(format!("Prescription with ID {} not found", prescription_id))
    })?;

    let normalized = validate_schedule_input(&payload)?;

    let created = medtrack_db::repositories::dose_schedule::create_schedule(
        &state.db_pool,
        prescription_id,
        &normalized.timezone,
        &normalized.days_of_week,
        &normalized.times,
        payload.quantity,
        payload.unit.as_deref(),
        payload.start_date,
        payload.end_date,
    )
    .await
    .map_err(MedError::Database)?;

    let schedule = created.into_core()?;
    let conflicts = conflicts_for(&state, user_id, &schedule).await?;

    Ok(Json(DoseScheduleResponse { schedule, conflicts }))
}

#[axum::debug_handler]
pub async fn update_schedule(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDoseScheduleRequest>,
) -> Result<Json<DoseScheduleResponse>, AppError> {
    let existing = medtrack_db::repositories::dose_schedule::get_schedule_for_user(
        &state.db_pool,
        user_id,
        id,
    )
    .await
    .map_err(MedError::Database)?
    .ok_or_else(|| MedError::NotFound(format!("Schedule with ID {} not found", id)))?;

    // Validate the schedule as it will be after the merge.
    let merged = CreateDoseScheduleRequest {
        timezone: payload.timezone.clone().unwrap_or_else(|| existing.timezone.clone()),
        days_of_week: match &payload.days_of_week {
            Some(days) => days.clone(),
            None => existing
                .days_of_week
                .iter()
                .map(|day| day.parse())
                .collect::<MedResult<_>>()?,
        },
        times: payload.times.clone().unwrap_or_else(|| existing.times.clone()),
        quantity: payload.quantity,
        unit: payload.unit.clone(),
        start_date: payload.start_date.or(existing.start_date),
        end_date: payload.end_date.or(existing.end_date),
    };
    let normalized = validate_schedule_input(&merged)?;

    let updated = medtrack_db::repositories::dose_schedule::update_schedule(
        &state.db_pool,
        id,
        Some(&normalized.timezone),
        Some(normalized.days_of_week.as_slice()),
        Some(normalized.times.as_slice()),
        payload.quantity,
        payload.unit.as_deref(),
        merged.start_date,
        merged.end_date,
    )
    .await
    .map_err(MedError::Database)?
    .ok_or_else(|| MedError::NotFound(format!("Schedule with ID {} not found", id)))?;

    // The recurrence rule changed: drop not-yet-due SCHEDULED instances
    // and let the next materializer run regenerate them under the new
    // rule. History is untouched.
    let rule_changed = payload.timezone.is_some()
        || payload.days_of_week.is_some()
        || payload.times.is_some()
        || payload.start_date.is_some()
        || payload.end_date.is_some();
    if rule_changed {
        medtrack_db::repositories::dose_log::delete_future_scheduled(&state.db_pool, id, Utc::now())
            .await
            .map_err(MedError::Database)?;
    }

    let schedule = updated.into_core()?;
    let conflicts = conflicts_for(&state, user_id, &schedule).await?;

    Ok(Json(DoseScheduleResponse { schedule, conflicts }))
}

/// Roll the schedule's current quantity/unit onto its future SCHEDULED
/// instances. Materialized history keeps its snapshot.
#[axum::debug_handler]
pub async fn apply_to_upcoming(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApplyToUpcomingRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    medtrack_db::repositories::dose_schedule::get_schedule_for_user(&state.db_pool, user_id, id)
        .await
        .map_err(MedError::Database)?
        .ok_or_else(|| MedError::NotFound(format!("Schedule with ID {} not found", id)))?;

    if let Some(quantity) = payload.quantity {
        medtrack_core::adherence::ensure_valid_quantity(quantity)?;
    }

    let updated = medtrack_db::repositories::dose_log::update_future_scheduled(
        &state.db_pool,
        id,
        payload.quantity,
        payload.unit.as_deref(),
        Utc::now(),
    )
    .await
    .map_err(MedError::Database)?;

    Ok(Json(serde_json::json!({ "updated": updated })))
}

#[axum::debug_handler]
pub async fn delete_schedule(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    medtrack_db::repositories::dose_schedule::get_schedule_for_user(&state.db_pool, user_id, id)
        .await
        .map_err(MedError::Database)?
        .ok_or_else(|| MedError::NotFound(format!("Schedule with ID {} not found", id)))?;

    // Future SCHEDULED instances go with the schedule; past doses keep
    // their quantity/unit snapshot and survive it.
    medtrack_db::repositories::dose_log::delete_future_scheduled(&state.db_pool, id, Utc::now())
        .await
        .map_err(MedError::Database)?;

    let deleted = medtrack_db::repositories::dose_schedule::delete_schedule(&state.db_pool, id)
        .await
        .map_err(MedError::Database)?;

    Ok(Json(serde_json::json!({ "deleted": deleted })))
}
