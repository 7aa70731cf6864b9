use courier::http::response::{Response, ResponseBuilder, StatusCode};
use courier::http::writer::serialize_response;

#[test]
fn test_serialized_response_framing() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/html")
        .body(b"<p>hi</p>".to_vec())
        .build();

    let bytes = serialize_response(&response);
    let text = String::from_utf8(bytes).unwrap();

    assert_eq!(
        text,
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 9\r\n\r\n<p>hi</p>"
    );
}

#[test]
fn test_serialized_reject_is_well_formed() {
    let bytes = serialize_response(&Response::reject(StatusCode::BadGateway));
    let text = String::from_utf8(bytes).unwrap();

    assert!(text.starts_with("HTTP/1.1 502 Bad Gateway\r\n"));
    assert!(text.contains("\r\nContent-Type: text/plain\r\n"));
    assert!(text.contains("\r\nContent-Length: 11\r\n"));
    assert!(text.ends_with("\r\n\r\nBad Gateway"));
}

#[test]
fn test_content_length_matches_body_for_binary_payloads() {
    let body = vec![0u8, 159, 146, 150]; // not valid UTF-8
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "image/gif")
        .body(body.clone())
        .build();

    let bytes = serialize_response(&response);

    // Body is appended untouched after the blank line
    assert!(bytes.ends_with(&body));
    let head_end = bytes
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("missing header terminator");
    assert_eq!(bytes.len() - (head_end + 4), body.len());
    let head = String::from_utf8_lossy(&bytes[..head_end]);
    assert!(head.contains(&format!("Content-Length: {}", body.len())));
}

#[test]
fn test_headers_serialized_in_insertion_order() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/plain")
        .header("X-First", "1")
        .header("X-Second", "2")
        .build();

    let text = String::from_utf8(serialize_response(&response)).unwrap();
    let content_type = text.find("Content-Type").unwrap();
    let first = text.find("X-First").unwrap();
    let second = text.find("X-Second").unwrap();

    assert!(content_type < first && first < second);
}
