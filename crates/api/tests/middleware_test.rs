use axum::extract::FromRequestParts;
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;
use medtrack_api::middleware::auth::{CurrentUser, USER_ID_HEADER};
use medtrack_api::middleware::error_handling::AppError;
use medtrack_core::errors::MedError;
use pretty_assertions::assert_eq;
use rstest::rstest;
use uuid::Uuid;

#[rstest]
#[case(MedError::NotFound("missing".to_string()), StatusCode::NOT_FOUND)]
#[case(MedError::Validation("bad".to_string()), StatusCode::BAD_REQUEST)]
#[case(MedError::Conflict("dup".to_string()), StatusCode::CONFLICT)]
#[case(MedError::Configuration("no keys".to_string()), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(MedError::Database(eyre::eyre!("down")), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_error_status_mapping(#[case] err: MedError, #[case] expected: StatusCode) {
    let response = AppError(err).into_response();
    assert_eq!(response.status(), expected);
}

async fn extract_user(request: Request<()>) -> Result<CurrentUser, StatusCode> {
    let (mut parts, _) = request.into_parts();
    CurrentUser::from_request_parts(&mut parts, &())
        .await
        .map_err(|rejection| rejection.into_response().status())
}

#[tokio::test]
async fn test_current_user_from_header() {
    let user_id = Uuid::new_v4();
    let request = Request::builder()
        .header(USER_ID_HEADER, user_id.to_string())
        .body(())
        .unwrap();

    let current = extract_user(request).await.unwrap();
    assert_eq!(current, CurrentUser(user_id));
}

#[tokio::test]
async fn test_missing_header_is_unauthorized() {
    let request = Request::builder().body(()).unwrap();
    let status = extract_user(request).await.unwrap_err();
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_header_is_unauthorized() {
    let request = Request::builder()
        .header(USER_ID_HEADER, "not-a-uuid")
        .body(())
        .unwrap();
    let status = extract_user(request).await.unwrap_err();
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
