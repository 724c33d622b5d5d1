//! Periodic trigger for the batch jobs.
//!
//! The scheduling policy lives here, outside the job functions: three
//! independent intervals invoke materialization, the missed sweep, and
//! reminder dispatch, each with an explicit `now`. Every run logs its
//! report; a failing run never stops the loop.

use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use dotenv::dotenv;
use medtrack_core::time::{Clock, SystemClock};
use medtrack_db::create_pool;
use medtrack_jobs::config::JobsConfig;
use medtrack_jobs::transport::HttpTransport;
use medtrack_jobs::{materialize, notify, sweep};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting MedTrack jobs runner");

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = JobsConfig::from_env()?;

    // Create database connection pool
    let db_pool = create_pool(&config.database_url).await?;

    let transport = Arc::new(HttpTransport::new(
        config.push_endpoint.clone(),
        config.email_endpoint.clone(),
        config.transport_token.clone(),
    ));

    let materialize_pool = db_pool.clone();
    let materialize_config = config.clone();
    let materialize_task = tokio::spawn(async move {
        let mut ticker =
            tokio::time::interval(Duration::from_secs(materialize_config.materialize_interval_secs));
        loop {
            ticker.tick().await;
            let report = materialize::materialize_all(
                &materialize_pool,
                SystemClock.now(),
                materialize_config.horizon_days,
            )
            .await;
            for error in &report.errors {
                warn!("Materialization error: {}", error);
            }
        }
    });

    let sweep_pool = db_pool.clone();
    let sweep_config = config.clone();
    let sweep_task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(sweep_config.sweep_interval_secs));
        loop {
            ticker.tick().await;
            let report = sweep::sweep_missed(&sweep_pool, SystemClock.now()).await;
            for error in &report.errors {
                warn!("Missed sweep error: {}", error);
            }
        }
    });

    let notify_pool = db_pool.clone();
    let notify_config = config.clone();
    let notify_task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(notify_config.notify_interval_secs));
        loop {
            ticker.tick().await;
            let report = notify::dispatch_reminders(
                &notify_pool,
                transport.as_ref(),
                SystemClock.now(),
                notify_config.send_window(),
            )
            .await;
            for error in &report.errors {
                warn!("Reminder dispatch error: {}", error);
            }
        }
    });

    // The tasks run until the process is stopped.
    let _ = tokio::try_join!(materialize_task, sweep_task, notify_task)?;

    Ok(())
}
