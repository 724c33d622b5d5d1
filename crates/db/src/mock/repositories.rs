use chrono::{DateTime, Utc};
use mockall::mock;
use uuid::Uuid;

use crate::models::{DbDoseLog, DbDoseSchedule, DbInventory, DbPrescription, DbUserSettings};
use crate::repositories::dose_log::InsertOutcome;

// Mock repositories for testing
mock! {
    pub PrescriptionRepo {
        pub async fn get_prescription_by_id(
            &self,
            user_id: Uuid,
            id: Uuid,
        ) -> eyre::Result<Option<DbPrescription>>;

        pub async fn list_schedulable_prescriptions(&self) -> eyre::Result<Vec<DbPrescription>>;
    }
}

mock! {
    pub DoseScheduleRepo {
        pub async fn get_schedule_for_user(
            &self,
            user_id: Uuid,
            id: Uuid,
        ) -> eyre::Result<Option<DbDoseSchedule>>;

        pub async fn list_schedules_by_prescription(
            &self,
            prescription_id: Uuid,
        ) -> eyre::Result<Vec<DbDoseSchedule>>;

        pub async fn list_schedules_for_user(
            &self,
            user_id: Uuid,
        ) -> eyre::Result<Vec<DbDoseSchedule>>;
    }
}

mock! {
    pub DoseLogRepo {
        pub async fn insert_scheduled_dose(
            &self,
            prescription_id: Uuid,
            schedule_id: Uuid,
            scheduled_for: DateTime<Utc>,
            quantity: Option<f64>,
            unit: Option<&'static str>,
        ) -> eyre::Result<InsertOutcome>;

        pub async fn get_dose_for_user(
            &self,
            user_id: Uuid,
            id: Uuid,
        ) -> eyre::Result<Option<DbDoseLog>>;

        pub async fn mark_dose_missed(&self, id: Uuid) -> eyre::Result<bool>;
    }
}

mock! {
    pub InventoryRepo {
        pub async fn get_inventory(
            &self,
            user_id: Uuid,
            medication_id: Uuid,
        ) -> eyre::Result<Option<DbInventory>>;
    }
}

mock! {
    pub SettingsRepo {
        pub async fn get_settings(
            &self,
            user_id: Uuid,
        ) -> eyre::Result<Option<DbUserSettings>>;
    }
}
