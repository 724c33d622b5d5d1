use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::MedError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    Push,
    Email,
}

impl fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationChannel::Push => write!(f, "push"),
            NotificationChannel::Email => write!(f, "email"),
        }
    }
}

impl FromStr for NotificationChannel {
    type Err = MedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "push" => Ok(NotificationChannel::Push),
            "email" => Ok(NotificationChannel::Email),
            other => Err(MedError::Validation(format!(
                "Unknown notification channel: {}",
                other
            ))),
        }
    }
}

/// Display preference only; scheduling always works in 24-hour form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeFormat {
    #[serde(rename = "12h")]
    Hour12,
    #[serde(rename = "24h")]
    Hour24,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    pub user_id: Uuid,
    pub timezone: String,
    pub time_format: TimeFormat,
    pub default_channels: BTreeSet<NotificationChannel>,
}

impl UserSettings {
    /// Defaults for a user who has never saved settings: UTC, 24-hour
    /// display, push notifications only.
    pub fn defaults(user_id: Uuid) -> Self {
        Self {
            user_id,
            timezone: "UTC".to_string(),
            time_format: TimeFormat::Hour24,
            default_channels: BTreeSet::from([NotificationChannel::Push]),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserSettingsRequest {
    pub timezone: Option<String>,
    pub time_format: Option<TimeFormat>,
    pub default_channels: Option<Vec<NotificationChannel>>,
}
