use chrono::Duration;
use eyre::{eyre, Result};
use serde::Deserialize;
use std::env;

use medtrack_core::reminder::DEFAULT_SEND_WINDOW_SECS;

/// How many days ahead the materializer runs by default.
pub const DEFAULT_HORIZON_DAYS: i64 = 14;

/// Configuration for the periodic jobs runner.
///
/// All values come from environment variables; only `DATABASE_URL` is
/// required. The notification endpoints are optional: a missing
/// endpoint degrades dispatch for that channel to a counted no-op.
#[derive(Debug, Clone, Deserialize)]
pub struct JobsConfig {
    /// Database connection URL (required)
    pub database_url: String,
    /// Days of SCHEDULED doses to keep materialized ahead of now
    pub horizon_days: i64,
    /// Reminder lookahead window, in seconds
    pub send_window_secs: i64,
    /// Seconds between materializer runs
    pub materialize_interval_secs: u64,
    /// Seconds between missed-dose sweeps
    pub sweep_interval_secs: u64,
    /// Seconds between reminder dispatch runs
    pub notify_interval_secs: u64,
    /// Push provider webhook endpoint
    pub push_endpoint: Option<String>,
    /// Email provider webhook endpoint
    pub email_endpoint: Option<String>,
    /// Bearer token for the notification provider
    pub transport_token: Option<String>,
}

impl JobsConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| eyre!("DATABASE_URL environment variable not set"))?;

        let horizon_days = env::var("MATERIALIZE_HORIZON_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_HORIZON_DAYS);

        let send_window_secs = env::var("NOTIFY_SEND_WINDOW_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SEND_WINDOW_SECS);

        let materialize_interval_secs = env::var("MATERIALIZE_INTERVAL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(24 * 60 * 60);

        let sweep_interval_secs = env::var("SWEEP_INTERVAL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        let notify_interval_secs = env::var("NOTIFY_INTERVAL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        let push_endpoint = env::var("PUSH_WEBHOOK_URL").ok();
        let email_endpoint = env::var("EMAIL_WEBHOOK_URL").ok();
        let transport_token = env::var("NOTIFICATION_PROVIDER_TOKEN").ok();

        Ok(Self {
            database_url,
            horizon_days,
            send_window_secs,
            materialize_interval_secs,
            sweep_interval_secs,
            notify_interval_secs,
            push_endpoint,
            email_endpoint,
            transport_token,
        })
    }

    pub fn send_window(&self) -> Duration {
        Duration::seconds(self.send_window_secs)
    }
}
