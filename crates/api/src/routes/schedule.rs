use axum::{
    routing::{delete, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/prescriptions/:id/schedules",
            post(handlers::schedule::create_schedule),
        )
        .route("/api/schedules/:id", put(handlers::schedule::update_schedule))
        .route("/api/schedules/:id", delete(handlers::schedule::delete_schedule))
        .route(
            "/api/schedules/:id/apply-to-upcoming",
            post(handlers::schedule::apply_to_upcoming),
        )
}
