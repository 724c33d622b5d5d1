use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::MedError;
use crate::models::settings::NotificationChannel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeliveryStatus {
    Sent,
    Failed,
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryStatus::Sent => write!(f, "SENT"),
            DeliveryStatus::Failed => write!(f, "FAILED"),
        }
    }
}

impl FromStr for DeliveryStatus {
    type Err = MedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SENT" => Ok(DeliveryStatus::Sent),
            "FAILED" => Ok(DeliveryStatus::Failed),
            other => Err(MedError::Validation(format!(
                "Unknown delivery status: {}",
                other
            ))),
        }
    }
}

/// Record of one delivery attempt for a dose reminder. A SENT row for a
/// (user, dose) pair suppresses further reminders for that dose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub dose_log_id: Uuid,
    pub channel: NotificationChannel,
    pub status: DeliveryStatus,
    pub created_at: DateTime<Utc>,
}

/// What the transport delivers. Kept provider-agnostic; the transport
/// decides how to render it per channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderPayload {
    pub dose_log_id: Uuid,
    pub medication_name: String,
    pub scheduled_for: DateTime<Utc>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
}
