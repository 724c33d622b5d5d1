//! Reminder dispatch.
//!
//! Finds SCHEDULED doses entering their send window with no SENT
//! notification yet, and delivers one reminder per configured default
//! channel. Gating is per dose: once any channel records SENT for a
//! dose, later runs skip that dose entirely. Transports that are not
//! configured degrade to counted no-ops.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use medtrack_core::errors::MedError;
use medtrack_core::models::notification::{DeliveryStatus, ReminderPayload};
use medtrack_core::models::settings::{NotificationChannel, UserSettings};
use medtrack_core::reminder;
use medtrack_db::models::DbReminderCandidate;
use medtrack_db::repositories::{dose_log, notification, settings};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::transport::NotificationTransport;

/// Outcome of one dispatch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DispatchReport {
    pub sent: usize,
    pub failed: usize,
    pub skipped_unconfigured: usize,
    pub errors: Vec<String>,
}

/// Channels a reminder goes out on: the user's saved defaults, or the
/// settings defaults for users who never saved any.
pub fn channels_for(
    user_settings: Option<UserSettings>,
    user_id: Uuid,
) -> BTreeSet<NotificationChannel> {
    user_settings
        .unwrap_or_else(|| UserSettings::defaults(user_id))
        .default_channels
}

/// Dispatch reminders for doses whose `scheduled_for` falls within
/// `[now, now + window]`.
pub async fn dispatch_reminders(
    pool: &PgPool,
    transport: &dyn NotificationTransport,
    now: DateTime<Utc>,
    window: Duration,
) -> DispatchReport {
    let mut report = DispatchReport::default();

    let candidates = match dose_log::list_reminder_candidates(pool, now, now + window).await {
        Ok(candidates) => candidates,
        Err(e) => {
            report.errors.push(format!("Failed to list reminder candidates: {}", e));
            return report;
        }
    };

    for candidate in candidates {
        dispatch_one(pool, transport, &candidate, now, window, &mut report).await;
    }

    tracing::info!(
        "Reminder dispatch complete: sent={}, failed={}, skipped_unconfigured={}, errors={}",
        report.sent,
        report.failed,
        report.skipped_unconfigured,
        report.errors.len()
    );
    report
}

async fn dispatch_one(
    pool: &PgPool,
    transport: &dyn NotificationTransport,
    candidate: &DbReminderCandidate,
    now: DateTime<Utc>,
    window: Duration,
    report: &mut DispatchReport,
) {
    // The query already filters on the window; re-check so a slow run
    // cannot remind about a dose that has slipped into the past.
    if !reminder::within_send_window(candidate.scheduled_for, now, window) {
        return;
    }

    let user_settings = match settings::get_settings(pool, candidate.user_id).await {
        Ok(row) => row.and_then(|row| row.into_core().ok()),
        Err(e) => {
            report.errors.push(format!(
                "Failed to load settings for user {}: {}",
                candidate.user_id, e
            ));
            return;
        }
    };

    let payload = ReminderPayload {
        dose_log_id: candidate.dose_log_id,
        medication_name: candidate.medication_name.clone(),
        scheduled_for: candidate.scheduled_for,
        quantity: candidate.quantity,
        unit: candidate.unit.clone(),
    };

    for channel in channels_for(user_settings, candidate.user_id) {
        match transport.send(candidate.user_id, channel, &payload).await {
            Ok(status) => {
                report.record_delivery(status);
                if let Err(e) = notification::record_notification(
                    pool,
                    candidate.user_id,
                    candidate.dose_log_id,
                    &channel.to_string(),
                    &status.to_string(),
                )
                .await
                {
                    report.errors.push(format!(
                        "Failed to record notification for dose {}: {}",
                        candidate.dose_log_id, e
                    ));
                }
            }
            // Channel not configured: a no-op, not a batch failure.
            Err(MedError::Configuration(reason)) => {
                tracing::debug!(
                    "Skipping unconfigured channel for dose {}: {}",
                    candidate.dose_log_id,
                    reason
                );
                report.skipped_unconfigured += 1;
            }
            Err(e) => report.errors.push(format!(
                "Failed to send reminder for dose {} on {}: {}",
                candidate.dose_log_id, channel, e
            )),
        }
    }
}

impl DispatchReport {
    fn record_delivery(&mut self, status: DeliveryStatus) {
        match status {
            DeliveryStatus::Sent => self.sent += 1,
            DeliveryStatus::Failed => self.failed += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_channels_fall_back_to_defaults() {
        let user_id = Uuid::new_v4();
        let channels = channels_for(None, user_id);
        assert_eq!(channels, BTreeSet::from([NotificationChannel::Push]));
    }

    #[test]
    fn test_saved_channels_win() {
        let user_id = Uuid::new_v4();
        let mut saved = UserSettings::defaults(user_id);
        saved.default_channels =
            BTreeSet::from([NotificationChannel::Push, NotificationChannel::Email]);
        let channels = channels_for(Some(saved), user_id);
        assert_eq!(channels.len(), 2);
    }

    #[test]
    fn test_report_delivery_counters() {
        let mut report = DispatchReport::default();
        report.record_delivery(DeliveryStatus::Sent);
        report.record_delivery(DeliveryStatus::Sent);
        report.record_delivery(DeliveryStatus::Failed);
        assert_eq!(report.sent, 2);
        assert_eq!(report.failed, 1);
    }
}
