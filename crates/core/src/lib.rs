//! # MedTrack Core
//!
//! Pure domain logic for the MedTrack medication-adherence service:
//! the data model, error taxonomy, timezone-aware clock utilities,
//! recurrence expansion, the dose lifecycle state machine, schedule
//! conflict checking, and inventory/reminder predicates.
//!
//! Nothing in this crate performs I/O. Persistence lives in
//! `medtrack-db`, the HTTP surface in `medtrack-api`, and the periodic
//! batch jobs in `medtrack-jobs`.

pub mod adherence;
pub mod conflict;
pub mod errors;
pub mod inventory;
pub mod models;
pub mod recurrence;
pub mod reminder;
pub mod time;
