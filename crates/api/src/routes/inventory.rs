use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/medications/:id/inventory",
            get(handlers::inventory::get_inventory),
        )
        .route(
            "/api/medications/:id/inventory",
            put(handlers::inventory::update_inventory),
        )
        .route("/api/inventory/low", get(handlers::inventory::list_low_stock))
}
