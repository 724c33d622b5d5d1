use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use medtrack_core::{
    adherence,
    errors::{MedError, MedResult},
    inventory::deplete,
    models::dose::{
        AdherenceSummary, CreateDoseLogRequest, DoseLog, DoseQuery, DoseStatus, TakeDoseRequest,
        UpdateDoseLogRequest,
    },
};
use medtrack_db::models::DbDoseLog;
use serde::Deserialize;
use uuid::Uuid;

use crate::{middleware::{auth::CurrentUser, error_handling::AppError}, ApiState};

/// Query parameters for the dose listing endpoint.
///
/// `prescription_ids` is a comma-separated list of UUIDs; `status` is
/// one of SCHEDULED/TAKEN/SKIPPED/MISSED.
#[derive(Debug, Deserialize)]
pub struct DoseListQuery {
    pub prescription_ids: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

/// Parse a comma-separated UUID list, ignoring blank segments.
pub fn parse_id_list(raw: &str) -> MedResult<Vec<Uuid>> {
    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            Uuid::parse_str(segment).map_err(|_| {
                MedError::Validation(format!("Invalid UUID in id list: {}", segment))
            })
        })
        .collect()
}

fn to_db_row(dose: &DoseLog) -> DbDoseLog {
    DbDoseLog {
        id: dose.id,
        prescription_id: dose.prescription_id,
        schedule_id: dose.schedule_id,
        scheduled_for: dose.scheduled_for,
        status: dose.status.to_string(),
        taken_at: dose.taken_at,
        quantity: dose.quantity,
        unit: dose.unit.clone(),
        created_at: dose.created_at,
    }
}

async fn load_owned_dose(
    state: &ApiState,
    user_id: Uuid,
    id: Uuid,
) -> Result<DoseLog, AppError> {
    let dose = medtrack_db::repositories::dose_log::get_dose_for_user(&state.db_pool, user_id, id)
        .await
        .map_err(MedError::Database)?
        .ok_or_else(|| MedError::NotFound(format!("Dose with ID {} not found", id)))?;

    Ok(dose.into_core()?)
}

/// Decrement the medication's inventory by the dose quantity, if both
/// exist. Inventory-less medications take doses without bookkeeping.
async fn deplete_inventory_for(
    state: &ApiState,
    user_id: Uuid,
    dose: &DoseLog,
) -> Result<(), AppError> {
    let Some(quantity) = dose.quantity else {
        return Ok(());
    };

    let prescription = medtrack_db::repositories::prescription::get_prescription_by_id(
        &state.db_pool,
        user_id,
        dose.prescription_id,
    )
    .await
    .map_err(MedError::Database)?;

    let Some(prescription) = prescription else {
        return Ok(());
    };

    let inventory = medtrack_db::repositories::inventory::get_inventory(
        &state.db_pool,
        user_id,
        prescription.medication_id,
    )
    .await
    .map_err(MedError::Database)?;

    if let Some(inventory) = inventory {
        medtrack_db::repositories::inventory::upsert_inventory(
            &state.db_pool,
            inventory.medication_id,
            deplete(inventory.current_qty, quantity),
            inventory.unit.as_deref(),
            inventory.low_threshold,
            inventory.last_restocked_at,
        )
        .await
        .map_err(MedError::Database)?;
    }

    Ok(())
}

#[axum::debug_handler]
pub async fn list_doses(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<DoseListQuery>,
) -> Result<Json<Vec<DoseLog>>, AppError> {
    let dose_query = DoseQuery {
        prescription_ids: query
            .prescription_ids
            .as_deref()
            .map(parse_id_list)
            .transpose()?,
        from: query.from,
        to: query.to,
        status: query
            .status
            .as_deref()
            .map(|status| status.parse::<DoseStatus>())
            .transpose()?,
    };

    let doses = medtrack_db::repositories::dose_log::list_doses(&state.db_pool, user_id, &dose_query)
        .await
        .map_err(MedError::Database)?
        .into_iter()
        .map(|row| row.into_core())
        .collect::<MedResult<Vec<_>>>()?;

    Ok(Json(doses))
}

#[axum::debug_handler]
pub async fn take_dose(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<TakeDoseRequest>,
) -> Result<Json<DoseLog>, AppError> {
    let mut dose = load_owned_dose(&state, user_id, id).await?;

    adherence::take(&mut dose, payload.taken_at.unwrap_or_else(Utc::now))?;

    let saved = medtrack_db::repositories::dose_log::save_dose(&state.db_pool, &to_db_row(&dose))
        .await
        .map_err(MedError::Database)?
        .into_core()?;

    deplete_inventory_for(&state, user_id, &saved).await?;

    Ok(Json(saved))
}

#[axum::debug_handler]
pub async fn skip_dose(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DoseLog>, AppError> {
    let mut dose = load_owned_dose(&state, user_id, id).await?;

    adherence::skip(&mut dose)?;

    let saved = medtrack_db::repositories::dose_log::save_dose(&state.db_pool, &to_db_row(&dose))
        .await
        .map_err(MedError::Database)?
        .into_core()?;

    Ok(Json(saved))
}

#[axum::debug_handler]
pub async fn update_dose(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDoseLogRequest>,
) -> Result<Json<DoseLog>, AppError> {
    let mut dose = load_owned_dose(&state, user_id, id).await?;

    adherence::apply_edit(&mut dose, &payload)?;

    let saved = medtrack_db::repositories::dose_log::save_dose(&state.db_pool, &to_db_row(&dose))
        .await
        .map_err(MedError::Database)?
        .into_core()?;

    Ok(Json(saved))
}

/// Manual or PRN dose entry. Defaults to a TAKEN record at "now", which
/// is how as-needed medication gets logged.
#[axum::debug_handler]
pub async fn create_dose(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<CreateDoseLogRequest>,
) -> Result<Json<DoseLog>, AppError> {
    medtrack_db::repositories::prescription::get_prescription_by_id(
        &state.db_pool,
        user_id,
        payload.prescription_id,
    )
    .await
    .map_err(MedError::Database)?
    .ok_or_else(|| {
        MedError::NotFound(format!(
            "Prescription with ID {} not found",
            payload.prescription_id
        ))
    })?;

    if let Some(quantity) = payload.quantity {
        adherence::ensure_valid_quantity(quantity)?;
    }

    let now = Utc::now();
    let status = payload.status.unwrap_or(DoseStatus::Taken);
    let scheduled_for = payload.scheduled_for.unwrap_or(now);
    let taken_at = match status {
        DoseStatus::Taken => Some(payload.taken_at.unwrap_or(now)),
        _ => None,
    };

    let created = medtrack_db::repositories::dose_log::create_manual_dose(
        &state.db_pool,
        payload.prescription_id,
        scheduled_for,
        &status.to_string(),
        taken_at,
        payload.quantity,
        payload.unit.as_deref(),
    )
    .await
    .map_err(MedError::Database)?
    .into_core()?;

    if created.status == DoseStatus::Taken {
        deplete_inventory_for(&state, user_id, &created).await?;
    }

    Ok(Json(created))
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[axum::debug_handler]
pub async fn adherence_summary(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<AdherenceSummary>, AppError> {
    let dose_query = DoseQuery {
        from: query.from,
        to: query.to,
        ..Default::default()
    };

    let doses = medtrack_db::repositories::dose_log::list_doses(&state.db_pool, user_id, &dose_query)
        .await
        .map_err(MedError::Database)?
        .into_iter()
        .map(|row| row.into_core())
        .collect::<MedResult<Vec<_>>>()?;

    Ok(Json(adherence::summarize(&doses)))
}
