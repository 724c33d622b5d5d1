use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/medications", post(handlers::medication::create_medication))
        .route("/api/medications", get(handlers::medication::list_medications))
        .route("/api/medications/:id", get(handlers::medication::get_medication))
        .route("/api/medications/:id", put(handlers::medication::update_medication))
        .route("/api/medications/:id", delete(handlers::medication::delete_medication))
}
