use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::schedule::DateWindow;

/// Links a medication to a user, optionally a care provider. `as_needed`
/// marks PRN prescriptions, which never have doses materialized. The
/// prescription window additionally bounds all of its schedules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prescription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub medication_id: Uuid,
    pub provider_id: Option<Uuid>,
    pub as_needed: bool,
    pub dosage: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Prescription {
    pub fn window(&self) -> DateWindow {
        DateWindow::new(self.start_date, self.end_date)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePrescriptionRequest {
    pub medication_id: Uuid,
    pub provider_id: Option<Uuid>,
    #[serde(default)]
    pub as_needed: bool,
    pub dosage: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePrescriptionRequest {
    pub provider_id: Option<Uuid>,
    pub as_needed: Option<bool>,
    pub dosage: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
