//! Missed-dose sweep.
//!
//! A SCHEDULED instance becomes MISSED once its scheduled wall-clock
//! time, in the owning user's current settings timezone, is strictly in
//! the past. The status guard on the UPDATE keeps the sweep idempotent
//! and lets a racing take win.

use chrono::{DateTime, Utc};
use medtrack_core::models::settings::UserSettings;
use medtrack_core::{adherence, time};
use medtrack_db::repositories::{dose_log, settings};
use serde::Serialize;
use sqlx::PgPool;

/// Outcome of one sweep run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    pub marked_missed: usize,
    pub errors: Vec<String>,
}

/// Sweep every user who currently has past-due SCHEDULED doses.
pub async fn sweep_missed(pool: &PgPool, now: DateTime<Utc>) -> SweepReport {
    let mut report = SweepReport::default();

    let user_ids = match dose_log::list_users_with_due_doses(pool, now).await {
        Ok(user_ids) => user_ids,
        Err(e) => {
            report.errors.push(format!("Failed to list users with due doses: {}", e));
            return report;
        }
    };

    for user_id in user_ids {
        // Missed-detection runs in the user's settings timezone, not the
        // schedule's; a user who never saved settings sweeps under UTC.
        let user_settings = match settings::get_settings(pool, user_id).await {
            Ok(Some(row)) => match row.into_core() {
                Ok(user_settings) => user_settings,
                Err(e) => {
                    report
                        .errors
                        .push(format!("User {} has invalid stored settings: {}", user_id, e));
                    continue;
                }
            },
            Ok(None) => UserSettings::defaults(user_id),
            Err(e) => {
                report
                    .errors
                    .push(format!("Failed to load settings for user {}: {}", user_id, e));
                continue;
            }
        };

        let tz = match time::parse_zone(&user_settings.timezone) {
            Ok(tz) => tz,
            Err(e) => {
                report
                    .errors
                    .push(format!("User {} has an invalid timezone: {}", user_id, e));
                continue;
            }
        };

        let due = match dose_log::list_due_scheduled_for_user(pool, user_id, now).await {
            Ok(due) => due,
            Err(e) => {
                report
                    .errors
                    .push(format!("Failed to list due doses for user {}: {}", user_id, e));
                continue;
            }
        };

        for dose in due {
            if !adherence::is_past_due(dose.scheduled_for, tz, now) {
                continue;
            }
            match dose_log::mark_dose_missed(pool, dose.id).await {
                // rows_affected == 0 means a take or another sweep got
                // there first; nothing to count.
                Ok(true) => report.marked_missed += 1,
                Ok(false) => {}
                Err(e) => report
                    .errors
                    .push(format!("Failed to mark dose {} missed: {}", dose.id, e)),
            }
        }
    }

    tracing::info!(
        "Missed sweep complete: marked_missed={}, errors={}",
        report.marked_missed,
        report.errors.len()
    );
    report
}
