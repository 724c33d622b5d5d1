//! # MedTrack Jobs
//!
//! The periodic batch operations behind the adherence engine:
//!
//! - [`materialize`] extends the horizon of SCHEDULED dose instances,
//! - [`sweep`] marks past-due SCHEDULED instances MISSED,
//! - [`notify`] dispatches reminders for doses entering their send
//!   window.
//!
//! Each job is a function of `(pool, now, horizon/window)` returning a
//! count-and-error-list report. Scheduling policy (intervals, signals)
//! belongs to the caller; nothing here sleeps or loops.

pub mod config;
pub mod materialize;
pub mod notify;
pub mod sweep;
pub mod transport;
