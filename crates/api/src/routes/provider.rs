use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/providers", post(handlers::provider::create_provider))
        .route("/api/providers", get(handlers::provider::list_providers))
        .route("/api/providers/:id", delete(handlers::provider::delete_provider))
}
