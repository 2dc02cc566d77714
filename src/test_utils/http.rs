use axum::{body::Body, http::StatusCode, response::Response};
use serde_json::Value;

#[track_caller]
pub(crate) fn get_header(response: &Response<Body>, header_name: &str) -> String {
    let header_error_message = format!("Headers missing {header_name}");

    response
        .headers()
        .get(header_name)
        .expect(&header_error_message)
        .to_str()
        .expect("Could not convert to str")
        .to_string()
}

pub(crate) async fn parse_json_body(response: Response<Body>) -> Value {
    let content_type = get_header(&response, "content-type");
    assert_eq!(content_type, "application/json");

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not read response body");

    serde_json::from_slice(&body).expect("Response body is not valid JSON")
}

/// Check that `response` has the status `want_status` and a JSON body `{"error": <message>}`.
pub(crate) async fn assert_json_error(
    response: Response<Body>,
    want_status: StatusCode,
    want_message: &str,
) {
    assert_eq!(response.status(), want_status);

    let body = parse_json_body(response).await;
    assert_eq!(body["error"], want_message, "got body {body}");
}
