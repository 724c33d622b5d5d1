use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{extract::State, Json};
use medtrack_core::{
    errors::MedError,
    models::settings::{TimeFormat, UpdateUserSettingsRequest, UserSettings},
    time::parse_zone,
};

use crate::{middleware::{auth::CurrentUser, error_handling::AppError}, ApiState};

fn time_format_label(format: TimeFormat) -> &'static str {
    match format {
        TimeFormat::Hour12 => "12h",
        TimeFormat::Hour24 => "24h",
    }
}

#[axum::debug_handler]
pub async fn get_settings(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<UserSettings>, AppError> {
    let settings = medtrack_db::repositories::settings::get_settings(&state.db_pool, user_id)
        .await
        .map_err(MedError::Database)?;

    // A user who never saved settings gets the defaults, not a 404.
    let settings = match settings {
        Some(row) => row.into_core()?,
        None => UserSettings::defaults(user_id),
    };

    Ok(Json(settings))
}

#[axum::debug_handler]
pub async fn update_settings(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<UpdateUserSettingsRequest>,
) -> Result<Json<UserSettings>, AppError> {
    let current = medtrack_db::repositories::settings::get_settings(&state.db_pool, user_id)
        .await
        .map_err(MedError::Database)?
        .map(|row| row.into_core())
        .transpose()?
        .unwrap_or_else(|| UserSettings::defaults(user_id));

    let timezone = match payload.timezone {
        Some(timezone) => {
            parse_zone(&timezone)?;
            timezone
        }
        None => current.timezone,
    };
    let time_format = payload.time_format.unwrap_or(current.time_format);
    let default_channels: BTreeSet<_> = match payload.default_channels {
        Some(channels) => channels.into_iter().collect(),
        None => current.default_channels,
    };

    let channel_labels: Vec<String> = default_channels.iter().map(|c| c.to_string()).collect();

    let saved = medtrack_db::repositories::settings::upsert_settings(
        &state.db_pool,
        user_id,
        &timezone,
        time_format_label(time_format),
        &channel_labels,
    )
    .await
    .map_err(MedError::Database)?;

    Ok(Json(saved.into_core()?))
}
