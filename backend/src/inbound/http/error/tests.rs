//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};
use serde_json::json;

const TRACE_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn store_failure(expected_trace_id: String) -> Error {
    Error::internal("password hash column corrupt")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"row": "users"}))
}

#[fixture]
fn taken_email(expected_trace_id: String) -> Error {
    Error::invalid_request("email is already registered")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"field": "email", "code": "email_taken"}))
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("login required"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("staff only"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("no such user"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("stale"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("database down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn decode_response(
    error: Error,
    expected_status: StatusCode,
    expected_trace_id: Option<&str>,
) -> Error {
    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), expected_status);

    let header = response.headers().get(TRACE_ID_HEADER);
    match expected_trace_id {
        Some(expected) => {
            let trace_id = header
                .expect("trace-id header is set by error_response")
                .to_str()
                .expect("trace-id is valid UTF-8");
            assert_eq!(trace_id, expected);
        }
        None => assert!(header.is_none(), "trace-id header should be absent"),
    }

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error JSON deserialises")
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted_but_keep_trace_id(
    store_failure: Error,
    expected_trace_id: String,
) {
    let payload = decode_response(
        store_failure,
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(expected_trace_id.as_str()),
    )
    .await;

    assert_eq!(payload.code(), ErrorCode::InternalError);
    assert_eq!(payload.message(), "Internal server error");
    assert_eq!(payload.trace_id(), Some(TRACE_ID));
    assert!(payload.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details(taken_email: Error, expected_trace_id: String) {
    let payload = decode_response(
        taken_email,
        StatusCode::BAD_REQUEST,
        Some(expected_trace_id.as_str()),
    )
    .await;

    assert_eq!(payload.code(), ErrorCode::InvalidRequest);
    assert_eq!(payload.message(), "email is already registered");
    assert_eq!(
        payload.details(),
        Some(&json!({"field": "email", "code": "email_taken"}))
    );
}

#[rstest]
#[actix_web::test]
async fn error_without_trace_id_omits_header() {
    let error = Error::unauthorized("login required");

    let payload = decode_response(error, StatusCode::UNAUTHORIZED, None).await;

    assert_eq!(payload.code(), ErrorCode::Unauthorized);
    assert_eq!(payload.trace_id(), None);
}

#[given("a database outage")]
fn a_database_outage() -> ErrorCode {
    ErrorCode::ServiceUnavailable
}

#[when("the adapter maps the code to an HTTP status")]
fn the_adapter_maps_the_code_to_an_http_status(code: ErrorCode) -> StatusCode {
    super::status_for(code)
}

#[then("the status is 503 Service Unavailable")]
fn the_status_is_503_service_unavailable(status: StatusCode) {
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[rstest]
fn outage_maps_to_service_unavailable() {
    let status = the_adapter_maps_the_code_to_an_http_status(a_database_outage());
    the_status_is_503_service_unavailable(status);
}

#[rstest]
fn from_actix_error_is_redacted_internal_error() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.details(), None);
}
