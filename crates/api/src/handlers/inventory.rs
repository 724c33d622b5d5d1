use std::sync::Arc;

use axum::{extract::{Path, State}, Json};
use chrono::Utc;
use medtrack_core::{
    errors::MedError,
    inventory::{apply_quantity_update, is_low_stock},
    models::inventory::{Inventory, InventoryResponse, UpdateInventoryRequest},
};
use uuid::Uuid;

use crate::{middleware::{auth::CurrentUser, error_handling::AppError}, ApiState};

fn to_response(inventory: Inventory) -> InventoryResponse {
    let low_stock = is_low_stock(&inventory);
    InventoryResponse { inventory, low_stock }
}

#[axum::debug_handler]
pub async fn get_inventory(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Path(medication_id): Path<Uuid>,
) -> Result<Json<InventoryResponse>, AppError> {
    medtrack_db::repositories::medication::get_medication_by_id(&state.db_pool, user_id, medication_id)
        .await
        .map_err(MedError::Database)?
        .ok_or_else(|| {
            MedError::NotFound(format!("Medication with ID {} not found", medication_id))
        })?;

    let inventory =
        medtrack_db::repositories::inventory::get_inventory(&state.db_pool, user_id, medication_id)
            .await
            .map_err(MedError::Database)?
            .ok_or_else(|| {
                MedError::NotFound(format!(
                    "No inventory recorded for medication {}",
                    medication_id
                ))
            })?;

    Ok(Json(to_response(inventory.into())))
}

/// Upsert-style quantity update with restock detection: a strict
/// increase stamps `last_restocked_at` unless the caller supplied one.
#[axum::debug_handler]
pub async fn update_inventory(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Path(medication_id): Path<Uuid>,
    Json(payload): Json<UpdateInventoryRequest>,
) -> Result<Json<InventoryResponse>, AppError> {
    medtrack_db::repositories::medication::get_medication_by_id(&state.db_pool, user_id, medication_id)
        .await
        .map_err(MedError::Database)?
        .ok_or_else(|| {
            MedError::NotFound(format!("Medication with ID {} not found", medication_id))
        })?;

    let previous =
        medtrack_db::repositories::inventory::get_inventory(&state.db_pool, user_id, medication_id)
            .await
            .map_err(MedError::Database)?
            .map(Inventory::from);

    let applied = apply_quantity_update(previous.as_ref(), &payload, Utc::now())?;

    let saved = medtrack_db::repositories::inventory::upsert_inventory(
        &state.db_pool,
        medication_id,
        applied.current_qty,
        applied.unit.as_deref(),
        applied.low_threshold,
        applied.last_restocked_at,
    )
    .await
    .map_err(MedError::Database)?;

    Ok(Json(to_response(saved.into())))
}

#[axum::debug_handler]
pub async fn list_low_stock(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<InventoryResponse>>, AppError> {
    let inventories = medtrack_db::repositories::inventory::list_low_stock(&state.db_pool, user_id)
        .await
        .map_err(MedError::Database)?;

    Ok(Json(
        inventories
            .into_iter()
            .map(|row| to_response(row.into()))
            .collect(),
    ))
}
