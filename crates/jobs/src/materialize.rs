//! Horizon materialization: turn recurrence rules into persisted
//! SCHEDULED dose instances.
//!
//! Safe to re-run over an overlapping horizon: the partial unique index
//! on (prescription_id, schedule_id, scheduled_for) absorbs every
//! duplicate as `AlreadyExists`, including instants that have since
//! been taken, skipped, or missed. Each (prescription, schedule, instant)
//! is processed independently; failures land in the report and never
//! abort the batch.

use chrono::{DateTime, Duration, Utc};
use medtrack_db::models::{DbDoseSchedule, DbPrescription};
use medtrack_db::repositories::dose_log::{self, InsertOutcome};
use medtrack_db::repositories::{dose_schedule, prescription};
use medtrack_core::recurrence;
use serde::Serialize;
use sqlx::PgPool;

/// Outcome of one materialization run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MaterializeReport {
    pub created: usize,
    pub skipped_existing: usize,
    pub errors: Vec<String>,
}

/// Extend the horizon for every non-PRN prescription of every user.
pub async fn materialize_all(
    pool: &PgPool,
    now: DateTime<Utc>,
    horizon_days: i64,
) -> MaterializeReport {
    let mut report = MaterializeReport::default();
    let to = now + Duration::days(horizon_days);

    let prescriptions = match prescription::list_schedulable_prescriptions(pool).await {
        Ok(prescriptions) => prescriptions,
        Err(e) => {
            report.errors.push(format!("Failed to list prescriptions: {}", e));
            return report;
        }
    };

    for rx in prescriptions {
        let schedules = match dose_schedule::list_schedules_by_prescription(pool, rx.id).await {
            Ok(schedules) => schedules,
            Err(e) => {
                report
                    .errors
                    .push(format!("Failed to list schedules for prescription {}: {}", rx.id, e));
                continue;
            }
        };

        for schedule in schedules {
            materialize_schedule(pool, &rx, schedule, now, to, &mut report).await;
        }
    }

    tracing::info!(
        "Materialization run complete: created={}, skipped_existing={}, errors={}",
        report.created,
        report.skipped_existing,
        report.errors.len()
    );
    report
}

/// Materialize one (prescription, schedule) pair over `[from, to]`.
pub async fn materialize_schedule(
    pool: &PgPool,
    rx: &DbPrescription,
    schedule: DbDoseSchedule,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    report: &mut MaterializeReport,
) {
    // PRN prescriptions never get pre-materialized doses.
    if rx.as_needed {
        return;
    }

    let schedule_id = schedule.id;
    let schedule = match schedule.into_core() {
        Ok(schedule) => schedule,
        Err(e) => {
            report
                .errors
                .push(format!("Schedule {} has invalid stored data: {}", schedule_id, e));
            return;
        }
    };

    // The prescription window truncates every schedule under it.
    let window = schedule.window().intersect(
        &medtrack_core::models::schedule::DateWindow::new(rx.start_date, rx.end_date),
    );

    let instants = match recurrence::expand_within(&schedule, &window, from, to) {
        Ok(instants) => instants,
        Err(e) => {
            report
                .errors
                .push(format!("Failed to expand schedule {}: {}", schedule.id, e));
            return;
        }
    };

    for instant in instants {
        match dose_log::insert_scheduled_dose(
            pool,
            rx.id,
            schedule.id,
            instant,
            schedule.quantity,
            schedule.unit.as_deref(),
        )
        .await
        {
            Ok(InsertOutcome::Created) => report.created += 1,
            Ok(InsertOutcome::AlreadyExists) => report.skipped_existing += 1,
            Err(e) => report
                .errors
                .push(format!("Failed to create dose at {} for schedule {}: {}", instant, schedule.id, e)),
        }
    }
}
