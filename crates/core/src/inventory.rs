//! Inventory depletion and low-stock rules.

use chrono::{DateTime, Utc};

use crate::errors::{MedError, MedResult};
use crate::models::inventory::{Inventory, UpdateInventoryRequest};

/// Low-stock holds when a threshold is configured and the remaining
/// quantity has reached or fallen below it.
pub fn is_low_stock(inventory: &Inventory) -> bool {
    matches!(inventory.low_threshold, Some(threshold) if inventory.current_qty <= threshold)
}

/// Apply a quantity update to the previous inventory state. A strict
/// increase counts as a restock and stamps `last_restocked_at` with
/// `now`, unless the caller supplied an explicit value, which wins.
/// Decreases never touch the restock timestamp.
pub fn apply_quantity_update(
    previous: Option<&Inventory>,
    update: &UpdateInventoryRequest,
    now: DateTime<Utc>,
) -> MedResult<AppliedInventory> {
    if update.current_qty < 0.0 || !update.current_qty.is_finite() {
        return Err(MedError::Validation(format!(
            "Inventory quantity must be a non-negative finite number, got: {}",
            update.current_qty
        )));
    }
    if let Some(threshold) = update.low_threshold {
        if threshold < 0.0 || !threshold.is_finite() {
            return Err(MedError::Validation(format!(
                "Low-stock threshold must be a non-negative finite number, got: {}",
                threshold
            )));
        }
    }

    let previous_qty = previous.map(|inv| inv.current_qty);
    let restocked = matches!(previous_qty, Some(prev) if update.current_qty > prev);

    let last_restocked_at = match update.last_restocked_at {
        Some(explicit) => Some(explicit),
        None if restocked => Some(now),
        None => previous.and_then(|inv| inv.last_restocked_at),
    };

    Ok(AppliedInventory {
        current_qty: update.current_qty,
        unit: update
            .unit
            .clone()
            .or_else(|| previous.and_then(|inv| inv.unit.clone())),
        low_threshold: update.low_threshold.or_else(|| previous.and_then(|inv| inv.low_threshold)),
        last_restocked_at,
    })
}

/// Result of applying an inventory update, ready to upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedInventory {
    pub current_qty: f64,
    pub unit: Option<String>,
    pub low_threshold: Option<f64>,
    pub last_restocked_at: Option<DateTime<Utc>>,
}

/// Quantity remaining after a dose is taken; never goes negative.
pub fn deplete(current_qty: f64, dose_qty: f64) -> f64 {
    (current_qty - dose_qty).max(0.0)
}
