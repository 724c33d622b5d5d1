use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareProvider {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub specialty: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCareProviderRequest {
    pub name: String,
    pub specialty: Option<String>,
    pub phone: Option<String>,
}
