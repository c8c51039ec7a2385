use super::*;
use axum::body;
use shared::domain::Field;

#[test]
fn empty_body_parses_as_empty_object() {
    assert!(parse_payload(b"").expect("empty").is_empty());
    assert!(parse_payload(b" \n").expect("whitespace").is_empty());
}

#[test]
fn non_object_bodies_are_malformed() {
    for body in [&b"not json"[..], b"[1,2]", b"\"fullName\"", b"null"] {
        let err = parse_payload(body).expect_err("malformed");
        assert!(matches!(err, RelayError::MalformedBody));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}

#[test]
fn object_body_keeps_unknown_keys() {
    let payload = parse_payload(br#"{"fullName":"Jane","utm":"flyer"}"#).expect("object");
    assert_eq!(payload["utm"], "flyer");
}

#[test]
fn error_kinds_map_to_statuses() {
    assert_eq!(
        RelayError::MethodNotAllowed.status(),
        StatusCode::METHOD_NOT_ALLOWED
    );
    assert_eq!(
        RelayError::Validation(ValidationError::MissingRequired {
            fields: vec![Field::Phone],
        })
        .status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        RelayError::PayloadTooLarge.status(),
        StatusCode::PAYLOAD_TOO_LARGE
    );
    assert_eq!(
        RelayError::MissingDestination.status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        RelayError::Upstream("Sheet locked".into()).status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn method_not_allowed_response_advertises_post() {
    let response = RelayError::MethodNotAllowed.into_response();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        response.headers().get(header::ALLOW).expect("allow"),
        "POST"
    );

    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let reply: SubmitResponse = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(reply, SubmitResponse::failure("Method Not Allowed"));
}

#[tokio::test]
async fn validation_error_body_carries_its_message() {
    let response = RelayError::from(ValidationError::MissingIdentity).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let reply: SubmitResponse = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(
        reply.error.as_deref(),
        Some("Full Name and Email are required")
    );
}
