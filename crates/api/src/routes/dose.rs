use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/doses", get(handlers::dose::list_doses))
        .route("/api/doses", post(handlers::dose::create_dose))
        .route("/api/doses/summary", get(handlers::dose::adherence_summary))
        .route("/api/doses/:id", put(handlers::dose::update_dose))
        .route("/api/doses/:id/take", post(handlers::dose::take_dose))
        .route("/api/doses/:id/skip", post(handlers::dose::skip_dose))
}
