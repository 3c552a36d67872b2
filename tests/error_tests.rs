// Error taxonomy and HTTP mapping tests

use axum::http::StatusCode;
use axum::response::IntoResponse;
use captiond::error::CaptionError;

#[test]
fn test_pipeline_error_messages_are_fixed() {
    assert_eq!(
        CaptionError::Fetch("connection refused".to_string()).to_string(),
        "Invalid URL"
    );
    assert_eq!(
        CaptionError::Decode("bad magic".to_string()).to_string(),
        "Invalid or unsupported image"
    );
    assert_eq!(
        CaptionError::TooLarge("decoded 2000x2000".to_string()).to_string(),
        "Image is too large"
    );
}

#[test]
fn test_detail_is_kept_for_logs() {
    let err = CaptionError::Fetch("connection refused".to_string());
    assert_eq!(err.detail(), Some("connection refused"));
    assert!(!err.to_string().contains("connection refused"));

    assert_eq!(CaptionError::Internal("boom".to_string()).detail(), None);
}

#[test]
fn test_pipeline_errors_map_to_bad_request() {
    for err in [
        CaptionError::Fetch(String::new()),
        CaptionError::Decode(String::new()),
        CaptionError::TooLarge(String::new()),
    ] {
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}

#[test]
fn test_operational_errors_map_to_server_error() {
    assert_eq!(
        CaptionError::Config("missing".to_string()).status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        CaptionError::Font("unparsable".to_string()).status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        CaptionError::Internal("boom".to_string()).status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn test_response_body_is_the_one_line_message() {
    let response = CaptionError::TooLarge("decoded 2000x2000".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(body.as_ref(), b"Image is too large\n");
}
