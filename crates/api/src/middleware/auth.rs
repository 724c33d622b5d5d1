//! # User Identity Module
//!
//! Authentication and session management live in the proxy in front of
//! this service; by the time a request arrives here it carries the
//! authenticated caller's id in the `x-user-id` header. This module
//! provides the [`CurrentUser`] extractor that turns that header into a
//! typed user id, rejecting requests where the header is missing or
//! malformed.
//!
//! The core never reads ambient session state: handlers pass
//! `CurrentUser.0` explicitly into every repository and domain call.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller, extracted from the trusted proxy header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub Uuid);

/// Rejection for requests without a usable identity header.
#[derive(Debug)]
pub struct AuthRejection(&'static str);

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.0 }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or(AuthRejection("Missing x-user-id header"))?;

        let value = header
            .to_str()
            .map_err(|_| AuthRejection("Invalid x-user-id header"))?;

        let user_id = Uuid::parse_str(value)
            .map_err(|_| AuthRejection("x-user-id header must be a UUID"))?;

        Ok(CurrentUser(user_id))
    }
}
