use crowding_client::utils::error::ErrorCategory;
use crowding_client::{
    ClientSettings, CrowdingError, CrowdingQueryClient, CrowdingSource, QueryRequest,
};
use httpmock::prelude::*;
use std::time::Duration;

fn settings_for(server: &MockServer, timeout_ms: u64, max_retries: u32) -> ClientSettings {
    ClientSettings {
        host: server.host(),
        port: server.port(),
        timeout_ms,
        max_retries,
        ..ClientSettings::default()
    }
}

#[tokio::test]
async fn test_reading_round_trip() {
    let server = MockServer::start_async().await;
    let payload = serde_json::json!({
        "line_id": "1",
        "line_number": "3",
        "line_carriage": "2",
        "person_num": 25,
        "crowd_level": 1
    });

    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/crowding")
                .query_param("line_id", "1")
                .query_param("line_number", "3")
                .query_param("line_carriage", "2");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({ "status": "success", "data": payload }));
        })
        .await;

    let client = CrowdingQueryClient::new(&settings_for(&server, 2_000, 1));
    assert_eq!(
        client.base_url(),
        format!("http://{}:{}", server.host(), server.port())
    );
    assert_eq!(client.retry_policy().max_retries, 1);
    assert_eq!(client.retry_policy().timeout, Duration::from_millis(2_000));

    let reading = client
        .submit_query(&QueryRequest::new("1", "3", "2"))
        .await
        .unwrap();

    api_mock.assert_async().await;
    assert_eq!(reading.line_id, "1");
    assert_eq!(reading.line_number, "3");
    assert_eq!(reading.line_carriage, "2");
    assert_eq!(reading.person_num, 25);
    assert_eq!(reading.crowd_level, 1);
}

#[tokio::test]
async fn test_integer_identifiers_and_timestamp_from_backend() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/crowding");
            then.status(200).json_body(serde_json::json!({
                "status": "success",
                "data": {
                    "line_id": 1,
                    "line_number": 3,
                    "line_carriage": 2,
                    "person_num": 40,
                    "crowd_level": 2,
                    "timestamp": "Tue, 01 Apr 2025 08:30:00 GMT"
                }
            }));
        })
        .await;

    let client = CrowdingQueryClient::new(&settings_for(&server, 2_000, 0));
    let reading = client
        .submit_query(&QueryRequest::new("1", "3", "2"))
        .await
        .unwrap();

    api_mock.assert_async().await;
    assert_eq!(reading.line_id, "1");
    assert_eq!(reading.person_num, 40);
    assert_eq!(
        reading.timestamp.as_deref(),
        Some("Tue, 01 Apr 2025 08:30:00 GMT")
    );
}

#[tokio::test]
async fn test_null_data_is_empty_result() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/crowding");
            then.status(200)
                .json_body(serde_json::json!({ "status": "success", "data": null }));
        })
        .await;

    let client = CrowdingQueryClient::new(&settings_for(&server, 2_000, 1));
    let err = client
        .submit_query(&QueryRequest::new("9", "9", "9"))
        .await
        .unwrap_err();

    assert!(matches!(err, CrowdingError::EmptyResult));
    assert_eq!(err.to_string(), "No matching data found");
}

#[tokio::test]
async fn test_error_status_with_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/crowding");
            then.status(200)
                .json_body(serde_json::json!({ "status": "error", "message": "line not found" }));
        })
        .await;

    let client = CrowdingQueryClient::new(&settings_for(&server, 2_000, 1));
    let err = client
        .submit_query(&QueryRequest::new("99", "1", "1"))
        .await
        .unwrap_err();

    match err {
        CrowdingError::ApplicationError { message } => assert_eq!(message, "line not found"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_error_status_without_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/crowding");
            then.status(200).json_body(serde_json::json!({ "status": "error" }));
        })
        .await;

    let client = CrowdingQueryClient::new(&settings_for(&server, 2_000, 1));
    let err = client
        .submit_query(&QueryRequest::new("1", "3", "2"))
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Application);
    assert_eq!(err.to_string(), "Query failed: unknown error");
}

#[tokio::test]
async fn test_non_json_body_is_decode_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/crowding");
            then.status(200).body("not json");
        })
        .await;

    let client = CrowdingQueryClient::new(&settings_for(&server, 2_000, 1));
    let err = client
        .submit_query(&QueryRequest::new("1", "3", "2"))
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Decode);
    assert!(err.to_string().starts_with("Parse error: "));
}

#[tokio::test]
async fn test_timeout_retries_once_then_fails() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/crowding");
            then.status(200)
                .delay(Duration::from_millis(800))
                .json_body(serde_json::json!({ "status": "success", "data": null }));
        })
        .await;

    let client = CrowdingQueryClient::new(&settings_for(&server, 100, 1));
    let err = client
        .submit_query(&QueryRequest::new("1", "3", "2"))
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Transport);
    assert!(err.to_string().starts_with("Request failed: "));
    api_mock.assert_hits_async(2).await;
}

#[tokio::test]
async fn test_timeout_without_retries_makes_one_attempt() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/crowding");
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(serde_json::json!({ "status": "success", "data": null }));
        })
        .await;

    let client = CrowdingQueryClient::new(&settings_for(&server, 100, 0));
    let err = client
        .submit_query(&QueryRequest::new("1", "3", "2"))
        .await
        .unwrap_err();

    assert!(matches!(err, CrowdingError::TransportError(_)));
    api_mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/crowding");
            then.status(500)
                .json_body(serde_json::json!({ "status": "error", "message": "db down" }));
        })
        .await;

    let client = CrowdingQueryClient::new(&settings_for(&server, 2_000, 1));
    let err = client
        .submit_query(&QueryRequest::new("1", "3", "2"))
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Transport);
    assert!(!err.is_retryable());
    api_mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_connection_refused_is_transport_failure() {
    // 先綁定再釋放，取得一個目前沒有人監聽的埠
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let settings = ClientSettings {
        port,
        timeout_ms: 500,
        max_retries: 1,
        ..ClientSettings::default()
    };

    let client = CrowdingQueryClient::new(&settings);
    let outcome = client
        .submit_query(&QueryRequest::new("1", "3", "2"))
        .await;

    let err = tokio_test::assert_err!(outcome);
    assert_eq!(err.category(), ErrorCategory::Transport);
    assert!(err.to_string().starts_with("Request failed: "));
    // 連線失敗不重試，直接回報
    assert!(!err.is_retryable());
}
