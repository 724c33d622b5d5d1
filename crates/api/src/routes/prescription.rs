use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/prescriptions", post(handlers::prescription::create_prescription))
        .route("/api/prescriptions", get(handlers::prescription::list_prescriptions))
        .route("/api/prescriptions/:id", get(handlers::prescription::get_prescription))
        .route("/api/prescriptions/:id", put(handlers::prescription::update_prescription))
        .route("/api/prescriptions/:id", delete(handlers::prescription::delete_prescription))
}
