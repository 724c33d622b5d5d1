use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create medications table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS medications (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL,
            name VARCHAR(255) NOT NULL,
            strength VARCHAR(255) NULL,
            form VARCHAR(255) NULL,
            notes TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create care_providers table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS care_providers (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL,
            name VARCHAR(255) NOT NULL,
            specialty VARCHAR(255) NULL,
            phone VARCHAR(64) NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create prescriptions table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS prescriptions (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL,
            medication_id UUID NOT NULL REFERENCES medications(id),
            provider_id UUID NULL REFERENCES care_providers(id),
            as_needed BOOLEAN NOT NULL DEFAULT FALSE,
            dosage VARCHAR(255) NULL,
            start_date DATE NULL,
            end_date DATE NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_prescription_window
                CHECK (start_date IS NULL OR end_date IS NULL OR start_date <= end_date)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create dose_schedules table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS dose_schedules (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            prescription_id UUID NOT NULL REFERENCES prescriptions(id) ON DELETE CASCADE,
            timezone VARCHAR(64) NOT NULL,
            days_of_week TEXT[] NOT NULL,
            times TEXT[] NOT NULL,
            quantity DOUBLE PRECISION NULL,
            unit VARCHAR(64) NULL,
            start_date DATE NULL,
            end_date DATE NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_schedule_window
                CHECK (start_date IS NULL OR end_date IS NULL OR start_date <= end_date)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create dose_logs table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS dose_logs (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            prescription_id UUID NOT NULL REFERENCES prescriptions(id) ON DELETE CASCADE,
            schedule_id UUID NULL REFERENCES dose_schedules(id) ON DELETE SET NULL,
            scheduled_for TIMESTAMP WITH TIME ZONE NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'SCHEDULED',
            taken_at TIMESTAMP WITH TIME ZONE NULL,
            quantity DOUBLE PRECISION NULL,
            unit VARCHAR(64) NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // The materialization concurrency guard: at most one dose instance
    // per (prescription, schedule, instant). Partial so manual logs
    // (schedule_id IS NULL) are unconstrained.
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS uniq_dose_logs_instance
            ON dose_logs(prescription_id, schedule_id, scheduled_for)
            WHERE schedule_id IS NOT NULL;
        "#,
    )
    .execute(pool)
    .await?;

    // Create inventories table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS inventories (
            medication_id UUID PRIMARY KEY REFERENCES medications(id) ON DELETE CASCADE,
            current_qty DOUBLE PRECISION NOT NULL DEFAULT 0,
            unit VARCHAR(64) NULL,
            low_threshold DOUBLE PRECISION NULL,
            last_restocked_at TIMESTAMP WITH TIME ZONE NULL,
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT non_negative_qty CHECK (current_qty >= 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create user_settings table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_settings (
            user_id UUID PRIMARY KEY,
            timezone VARCHAR(64) NOT NULL DEFAULT 'UTC',
            time_format VARCHAR(8) NOT NULL DEFAULT '24h',
            default_channels TEXT[] NOT NULL DEFAULT ARRAY['push'],
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create notification_logs table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS notification_logs (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL,
            dose_log_id UUID NOT NULL REFERENCES dose_logs(id) ON DELETE CASCADE,
            channel VARCHAR(16) NOT NULL,
            status VARCHAR(16) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_medications_user_id ON medications(user_id);
        CREATE INDEX IF NOT EXISTS idx_care_providers_user_id ON care_providers(user_id);
        CREATE INDEX IF NOT EXISTS idx_prescriptions_user_id ON prescriptions(user_id);
        CREATE INDEX IF NOT EXISTS idx_prescriptions_medication_id ON prescriptions(medication_id);
        CREATE INDEX IF NOT EXISTS idx_dose_schedules_prescription_id ON dose_schedules(prescription_id);
        CREATE INDEX IF NOT EXISTS idx_dose_logs_prescription_scheduled ON dose_logs(prescription_id, scheduled_for);
        CREATE INDEX IF NOT EXISTS idx_dose_logs_schedule_status_scheduled ON dose_logs(schedule_id, status, scheduled_for);
        CREATE INDEX IF NOT EXISTS idx_dose_logs_status_scheduled ON dose_logs(status, scheduled_for);
        CREATE INDEX IF NOT EXISTS idx_notification_logs_dose ON notification_logs(dose_log_id, status);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
