use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medication {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub strength: Option<String>,
    pub form: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMedicationRequest {
    pub name: String,
    pub strength: Option<String>,
    pub form: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMedicationRequest {
    pub name: Option<String>,
    pub strength: Option<String>,
    pub form: Option<String>,
    pub notes: Option<String>,
}
