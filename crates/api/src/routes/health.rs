use axum::{routing::get, Json, Router};
use std::sync::Arc;

use crate::ApiState;

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route("/health", get(health_check))
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
