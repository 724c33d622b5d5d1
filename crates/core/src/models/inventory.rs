use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stock on hand for one medication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    pub medication_id: Uuid,
    pub current_qty: f64,
    pub unit: Option<String>,
    pub low_threshold: Option<f64>,
    pub last_restocked_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Upsert-style quantity update. An explicit `last_restocked_at` takes
/// precedence over restock detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateInventoryRequest {
    pub current_qty: f64,
    pub unit: Option<String>,
    pub low_threshold: Option<f64>,
    pub last_restocked_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryResponse {
    pub inventory: Inventory,
    pub low_stock: bool,
}
