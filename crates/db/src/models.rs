use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use medtrack_core::errors::{MedError, MedResult};
use medtrack_core::models::dose::{DoseLog, DoseStatus};
use medtrack_core::models::inventory::Inventory;
use medtrack_core::models::medication::Medication;
use medtrack_core::models::notification::{DeliveryStatus, NotificationLog};
use medtrack_core::models::prescription::Prescription;
use medtrack_core::models::provider::CareProvider;
use medtrack_core::models::schedule::{DayOfWeek, DoseSchedule};
use medtrack_core::models::settings::{
    NotificationChannel, TimeFormat, UserSettings,
};
use medtrack_core::time::parse_time_of_day;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbMedication {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub strength: Option<String>,
    pub form: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DbMedication> for Medication {
    fn from(row: DbMedication) -> Self {
        Medication {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            strength: row.strength,
            form: row.form,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCareProvider {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub specialty: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DbCareProvider> for CareProvider {
    fn from(row: DbCareProvider) -> Self {
        CareProvider {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            specialty: row.specialty,
            phone: row.phone,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbPrescription {
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

impl From<DbPrescription> for Prescription {
    fn from(row: DbPrescription) -> Self {
        Prescription {
            id: row.id,
            user_id: row.user_id,
            medication_id: row.medication_id,
            provider_id: row.provider_id,
            as_needed: row.as_needed,
            dosage: row.dosage,
            start_date: row.start_date,
            end_date: row.end_date,
            created_at: row.created_at,
        }
    }
}

/// Days and times are stored as TEXT[] in their wire forms ("MON",
/// "08:00") and parsed back into sets on the way out.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbDoseSchedule {
    pub id: Uuid,
    pub prescription_id: Uuid,
    pub timezone: String,
    pub days_of_week: Vec<String>,
    pub times: Vec<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl DbDoseSchedule {
    pub fn into_core(self) -> MedResult<DoseSchedule> {
        let days_of_week = self
            .days_of_week
            .iter()
            .map(|day| DayOfWeek::from_str(day))
            .collect::<MedResult<_>>()?;
        let times = self
            .times
            .iter()
            .map(|time| parse_time_of_day(time))
            .collect::<MedResult<_>>()?;

        Ok(DoseSchedule {
            id: self.id,
            prescription_id: self.prescription_id,
            timezone: self.timezone,
            days_of_week,
            times,
            quantity: self.quantity,
            unit: self.unit,
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbDoseLog {
    pub id: Uuid,
    pub prescription_id: Uuid,
    pub schedule_id: Option<Uuid>,
    pub scheduled_for: DateTime<Utc>,
    pub status: String,
    pub taken_at: Option<DateTime<Utc>>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DbDoseLog {
    pub fn into_core(self) -> MedResult<DoseLog> {
        Ok(DoseLog {
            id: self.id,
            prescription_id: self.prescription_id,
            schedule_id: self.schedule_id,
            scheduled_for: self.scheduled_for,
            status: DoseStatus::from_str(&self.status)?,
            taken_at: self.taken_at,
            quantity: self.quantity,
            unit: self.unit,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbInventory {
    pub medication_id: Uuid,
    pub current_qty: f64,
    pub unit: Option<String>,
    pub low_threshold: Option<f64>,
    pub last_restocked_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbInventory> for Inventory {
    fn from(row: DbInventory) -> Self {
        Inventory {
            medication_id: row.medication_id,
            current_qty: row.current_qty,
            unit: row.unit,
            low_threshold: row.low_threshold,
            last_restocked_at: row.last_restocked_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUserSettings {
    pub user_id: Uuid,
    pub timezone: String,
    pub time_format: String,
    pub default_channels: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl DbUserSettings {
    pub fn into_core(self) -> MedResult<UserSettings> {
        let time_format = match self.time_format.as_str() {
            "12h" => TimeFormat::Hour12,
            "24h" => TimeFormat::Hour24,
            other => {
                return Err(MedError::Validation(format!(
                    "Unknown time format: {}",
                    other
                )))
            }
        };
        let default_channels = self
            .default_channels
            .iter()
            .map(|channel| NotificationChannel::from_str(channel))
            .collect::<MedResult<_>>()?;

        Ok(UserSettings {
            user_id: self.user_id,
            timezone: self.timezone,
            time_format,
            default_channels,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbNotificationLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub dose_log_id: Uuid,
    pub channel: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl DbNotificationLog {
    pub fn into_core(self) -> MedResult<NotificationLog> {
        Ok(NotificationLog {
            id: self.id,
            user_id: self.user_id,
            dose_log_id: self.dose_log_id,
            channel: NotificationChannel::from_str(&self.channel)?,
            status: DeliveryStatus::from_str(&self.status)?,
            created_at: self.created_at,
        })
    }
}

/// Joined row for the reminder dispatcher: the dose plus the context the
/// payload needs, minus anything already SENT.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReminderCandidate {
    pub dose_log_id: Uuid,
    pub user_id: Uuid,
    pub prescription_id: Uuid,
    pub scheduled_for: DateTime<Utc>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub medication_name: String,
}
