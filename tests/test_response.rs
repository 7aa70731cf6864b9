use courier::http::response::{Response, ResponseBuilder, StatusCode};

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
    assert_eq!(StatusCode::NotImplemented.as_u16(), 501);
    assert_eq!(StatusCode::BadGateway.as_u16(), 502);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(
        StatusCode::InternalServerError.reason_phrase(),
        "Internal Server Error"
    );
    assert_eq!(StatusCode::NotImplemented.reason_phrase(), "Not Implemented");
    assert_eq!(StatusCode::BadGateway.reason_phrase(), "Bad Gateway");
}

#[test]
fn test_response_builder_basic() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .body(b"Hello, World!".to_vec())
        .build();

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.body, b"Hello, World!".to_vec());
}

#[test]
fn test_response_builder_with_headers() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/plain")
        .header("X-Custom", "value")
        .body(b"test".to_vec())
        .build();

    assert_eq!(response.headers.get("Content-Type").unwrap(), "text/plain");
    assert_eq!(response.headers.get("X-Custom").unwrap(), "value");
}

#[test]
fn test_response_builder_auto_content_length() {
    let body = b"This is the body".to_vec();
    let response = ResponseBuilder::new(StatusCode::Ok)
        .body(body.clone())
        .build();

    let content_length = response.headers.get("Content-Length").unwrap();
    assert_eq!(content_length, body.len().to_string());
}

#[test]
fn test_response_builder_preserves_custom_content_length() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Length", "999")
        .body(b"test".to_vec())
        .build();

    // Should keep the custom value
    assert_eq!(response.headers.get("Content-Length").unwrap(), "999");
}

#[test]
fn test_response_builder_empty_body() {
    let response = ResponseBuilder::new(StatusCode::Ok).build();

    assert_eq!(response.body.len(), 0);
    assert_eq!(response.headers.get("Content-Length").unwrap(), "0");
}

#[test]
fn test_response_builder_header_replaces() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/plain")
        .header("Content-Type", "text/html")
        .body(b"<p>hi</p>".to_vec())
        .build();

    assert_eq!(response.headers.get("Content-Type").unwrap(), "text/html");
    assert_eq!(response.headers.len(), 2); // Content-Type + auto Content-Length
}

#[test]
fn test_response_builder_various_status_codes() {
    let statuses = vec![
        StatusCode::Ok,
        StatusCode::BadRequest,
        StatusCode::NotFound,
        StatusCode::BadGateway,
    ];

    for status in statuses {
        let response = ResponseBuilder::new(status).body(b"test".to_vec()).build();
        assert_eq!(response.status, status);
    }
}

#[test]
fn test_response_ok_helper() {
    let response = Response::ok("test content");

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.body, b"test content".to_vec());
    assert_eq!(response.headers.get("Content-Type").unwrap(), "text/plain");
}

#[test]
fn test_response_reject_body_is_the_status_text() {
    let response = Response::reject(StatusCode::NotFound);

    assert_eq!(response.status, StatusCode::NotFound);
    assert_eq!(response.body, b"Not Found".to_vec());
    assert_eq!(response.headers.get("Content-Type").unwrap(), "text/plain");
    assert_eq!(response.headers.get("Content-Length").unwrap(), "9");
}

#[test]
fn test_response_reject_every_error_code() {
    for status in [
        StatusCode::BadRequest,
        StatusCode::NotFound,
        StatusCode::InternalServerError,
        StatusCode::NotImplemented,
        StatusCode::BadGateway,
    ] {
        let response = Response::reject(status);
        assert_eq!(response.body, status.reason_phrase().as_bytes());
        assert_eq!(
            response.headers.get("Content-Length").unwrap(),
            status.reason_phrase().len().to_string()
        );
    }
}
