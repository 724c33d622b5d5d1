pub mod dose;
pub mod inventory;
pub mod medication;
pub mod notification;
pub mod prescription;
pub mod provider;
pub mod schedule;
pub mod settings;
