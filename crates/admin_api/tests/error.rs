use admin_api::error::parse_error_message;
use admin_api::{AdminApiError, SessionExpiredReason, StatusCode};

#[test]
fn parse_error_message_prefers_message_field() {
    let body = r#"{"message":"name is required","error":"validation"}"#;
    assert_eq!(
        parse_error_message(StatusCode::UNPROCESSABLE_ENTITY, body),
        "name is required"
    );
}

#[test]
fn parse_error_message_reads_error_string_or_object() {
    assert_eq!(
        parse_error_message(StatusCode::FORBIDDEN, r#"{"error":"not an admin"}"#),
        "not an admin"
    );
    assert_eq!(
        parse_error_message(
            StatusCode::BAD_REQUEST,
            r#"{"error":{"code":"bad_request","message":"invalid status"}}"#
        ),
        "invalid status"
    );
}

#[test]
fn parse_error_message_accepts_capitalized_description() {
    assert_eq!(
        parse_error_message(StatusCode::CONFLICT, r#"{"Description":"email already used"}"#),
        "email already used"
    );
}

#[test]
fn parse_error_message_falls_back_to_raw_body_then_reason() {
    assert_eq!(
        parse_error_message(StatusCode::INTERNAL_SERVER_ERROR, "raw failure text"),
        "raw failure text"
    );
    assert_eq!(
        parse_error_message(StatusCode::BAD_GATEWAY, "   "),
        "Bad Gateway"
    );
}

#[test]
fn session_expired_reason_is_reported_in_display() {
    let err = AdminApiError::SessionExpired(SessionExpiredReason::RefreshRejected(
        "HTTP 403 Forbidden".to_string(),
    ));
    assert!(err.is_session_expired());
    assert_eq!(err.status(), None);
    assert_eq!(
        err.to_string(),
        "session expired: token refresh failed: HTTP 403 Forbidden"
    );
}
