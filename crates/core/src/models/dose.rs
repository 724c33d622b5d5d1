use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::MedError;

/// Lifecycle status of one dose instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DoseStatus {
    Scheduled,
    Taken,
    Skipped,
    Missed,
}

impl fmt::Display for DoseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DoseStatus::Scheduled => "SCHEDULED",
            DoseStatus::Taken => "TAKEN",
            DoseStatus::Skipped => "SKIPPED",
            DoseStatus::Missed => "MISSED",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for DoseStatus {
    type Err = MedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SCHEDULED" => Ok(DoseStatus::Scheduled),
            "TAKEN" => Ok(DoseStatus::Taken),
            "SKIPPED" => Ok(DoseStatus::Skipped),
            "MISSED" => Ok(DoseStatus::Missed),
            other => Err(MedError::Validation(format!("Unknown dose status: {}", other))),
        }
    }
}

/// One concrete expected-or-recorded medication event.
///
/// Materialized rows carry the originating schedule id; manual and PRN
/// logs have none. Quantity and unit are snapshots taken from the
/// schedule at creation time and remain editable independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoseLog {
    pub id: Uuid,
    pub prescription_id: Uuid,
    pub schedule_id: Option<Uuid>,
    pub scheduled_for: DateTime<Utc>,
    pub status: DoseStatus,
    pub taken_at: Option<DateTime<Utc>>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Manual or PRN dose entry. Defaults to TAKEN at the given instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoseLogRequest {
    pub prescription_id: Uuid,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub status: Option<DoseStatus>,
    pub taken_at: Option<DateTime<Utc>>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TakeDoseRequest {
    pub taken_at: Option<DateTime<Utc>>,
}

/// Direct field edit on a dose instance. Only provided fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDoseLogRequest {
    pub status: Option<DoseStatus>,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub taken_at: Option<DateTime<Utc>>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
}

/// Typed query parameters for dose listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DoseQuery {
    pub prescription_ids: Option<Vec<Uuid>>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub status: Option<DoseStatus>,
}

/// Adherence roll-up over a query range. The rate excludes still-pending
/// SCHEDULED instances from the denominator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdherenceSummary {
    pub taken: u64,
    pub skipped: u64,
    pub missed: u64,
    pub scheduled: u64,
    pub adherence_rate: Option<f64>,
}
