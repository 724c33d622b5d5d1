//! Dose lifecycle state machine.
//!
//! Statuses: SCHEDULED (initial), TAKEN, SKIPPED, MISSED. The only
//! automatic transition is missed-detection out of SCHEDULED; everything
//! else is user-initiated. Administrative correction between terminal
//! statuses goes through [`apply_edit`], which trusts the caller.
//!
//! Timezone rule: the schedule's zone governs occurrence generation; the
//! user-settings zone governs missed-detection and display.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::errors::{MedError, MedResult};
use crate::models::dose::{AdherenceSummary, DoseLog, DoseStatus, UpdateDoseLogRequest};

/// Mark a dose taken. Allowed from SCHEDULED at any time (no deadline),
/// and from MISSED so a late take corrects the sweep's verdict.
pub fn take(dose: &mut DoseLog, taken_at: DateTime<Utc>) -> MedResult<()> {
    match dose.status {
        DoseStatus::Scheduled | DoseStatus::Missed => {
            dose.status = DoseStatus::Taken;
            dose.taken_at = Some(taken_at);
            Ok(())
        }
        DoseStatus::Taken => Err(MedError::Validation(
            "Dose is already marked taken".to_string(),
        )),
        DoseStatus::Skipped => Err(MedError::Validation(
            "Dose was skipped; edit it directly to correct the record".to_string(),
        )),
    }
}

/// Mark a dose skipped. Same entry states as [`take`]; never sets
/// `taken_at`.
pub fn skip(dose: &mut DoseLog) -> MedResult<()> {
    match dose.status {
        DoseStatus::Scheduled | DoseStatus::Missed => {
            dose.status = DoseStatus::Skipped;
            dose.taken_at = None;
            Ok(())
        }
        DoseStatus::Skipped => Err(MedError::Validation(
            "Dose is already marked skipped".to_string(),
        )),
        DoseStatus::Taken => Err(MedError::Validation(
            "Dose was taken; edit it directly to correct the record".to_string(),
        )),
    }
}

/// Missed-detection predicate: the scheduled wall-clock in the user's
/// timezone is strictly earlier than now's wall-clock in that zone.
pub fn is_past_due(scheduled_for: DateTime<Utc>, user_tz: Tz, now: DateTime<Utc>) -> bool {
    scheduled_for.with_timezone(&user_tz).naive_local() < now.with_timezone(&user_tz).naive_local()
}

/// Automatic missed transition. Only SCHEDULED doses qualify, which is
/// what makes the sweep idempotent.
pub fn mark_missed_if_due(
    dose: &mut DoseLog,
    user_tz: Tz,
    now: DateTime<Utc>,
) -> bool {
    if dose.status == DoseStatus::Scheduled && is_past_due(dose.scheduled_for, user_tz, now) {
        dose.status = DoseStatus::Missed;
        true
    } else {
        false
    }
}

/// Direct field edit, including administrative status correction. The
/// only validation is on quantity; ownership is checked by the caller
/// before the dose ever reaches here.
pub fn apply_edit(dose: &mut DoseLog, edit: &UpdateDoseLogRequest) -> MedResult<()> {
    if let Some(quantity) = edit.quantity {
        ensure_valid_quantity(quantity)?;
    }

    if let Some(status) = edit.status {
        dose.status = status;
        if status != DoseStatus::Taken {
            dose.taken_at = None;
        }
    }
    if let Some(scheduled_for) = edit.scheduled_for {
        dose.scheduled_for = scheduled_for;
    }
    if let Some(taken_at) = edit.taken_at {
        dose.taken_at = Some(taken_at);
    }
    if let Some(quantity) = edit.quantity {
        dose.quantity = Some(quantity);
    }
    if let Some(unit) = &edit.unit {
        dose.unit = Some(unit.clone());
    }
    Ok(())
}

pub fn ensure_valid_quantity(quantity: f64) -> MedResult<()> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(MedError::Validation(format!(
            "Quantity must be a positive finite number, got: {}",
            quantity
        )));
    }
    Ok(())
}

/// Taken / (taken + skipped + missed), as a percentage. SCHEDULED
/// instances are still pending and stay out of the denominator.
pub fn adherence_rate(taken: u64, skipped: u64, missed: u64) -> Option<f64> {
    let resolved = taken + skipped + missed;
    if resolved == 0 {
        return None;
    }
    Some(taken as f64 * 100.0 / resolved as f64)
}

/// Roll a set of dose logs up into an adherence summary.
pub fn summarize(doses: &[DoseLog]) -> AdherenceSummary {
    let mut taken = 0u64;
    let mut skipped = 0u64;
    let mut missed = 0u64;
    let mut scheduled = 0u64;
    for dose in doses {
        match dose.status {
            DoseStatus::Taken => taken += 1,
            DoseStatus::Skipped => skipped += 1,
            DoseStatus::Missed => missed += 1,
            DoseStatus::Scheduled => scheduled += 1,
        }
    }
    AdherenceSummary {
        taken,
        skipped,
        missed,
        scheduled,
        adherence_rate: adherence_rate(taken, skipped, missed),
    }
}
