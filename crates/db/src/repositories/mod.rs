pub mod dose_log;
pub mod dose_schedule;
pub mod inventory;
pub mod medication;
pub mod notification;
pub mod prescription;
pub mod provider;
pub mod settings;
