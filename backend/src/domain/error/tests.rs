//! Tests for domain error construction and serialisation.

use super::*;
use crate::middleware::trace::TraceId;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn base_error() -> Error {
    Error::invalid_request("bad")
}

#[rstest]
#[case(Error::invalid_request("x"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("x"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("x"), ErrorCode::Forbidden)]
#[case(Error::not_found("x"), ErrorCode::NotFound)]
#[case(Error::conflict("x"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("x"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("x"), ErrorCode::InternalError)]
fn constructors_set_codes(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn try_with_trace_id_rejects_empty_values(base_error: Error) {
    let result = base_error.try_with_trace_id("   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[tokio::test]
async fn new_captures_scoped_trace_id() {
    let trace_id: TraceId = TRACE_ID.parse().expect("valid UUID");
    let error = TraceId::scope(trace_id, async { Error::internal("boom") }).await;
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn detail_code_reads_nested_code(base_error: Error) {
    let error = base_error.with_details(json!({ "code": "offset_out_of_range" }));
    assert_eq!(error.detail_code(), Some("offset_out_of_range"));
}

#[rstest]
fn detail_code_is_none_without_details(base_error: Error) {
    assert!(base_error.detail_code().is_none());
}

#[rstest]
fn serialises_with_snake_case_code() {
    let error = Error::conflict("taken").with_trace_id(TRACE_ID);
    let value = serde_json::to_value(&error).expect("serialise error");
    assert_eq!(value["code"], "conflict");
    assert_eq!(value["message"], "taken");
    assert_eq!(value["traceId"], TRACE_ID);
    assert!(value.get("details").is_none());
}
