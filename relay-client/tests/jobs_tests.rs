//! Integration tests for the media API client

mod common;

use common::{instant_poller, setup_mock_server};
use relay_client::{ClientError, MediaClient};
use relay_core::domain::handle::JobHandle;
use relay_core::domain::status::PollerStatus;
use relay_core::domain::tool::Tool;
use relay_poller::ErrorKind;
use serde_json::{Value, json};
use tokio_test::assert_ok;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_start_job_posts_params_to_tool_endpoint() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/video-to-gif"))
        .and(body_json(json!({ "fps": 12 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "taskId": "t-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = MediaClient::new(server.uri());
    let response = assert_ok!(client.start_job(Tool::VideoToGif, &json!({ "fps": 12 })).await);

    assert_eq!(response.handle(), Some(JobHandle::from("t-1")));
}

#[tokio::test]
async fn test_job_status_reads_poll_result() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "PROGRESS",
            "progress": 55,
        })))
        .mount(&server)
        .await;

    let client = MediaClient::new(server.uri());
    let poll = assert_ok!(client.job_status(&JobHandle::from(77)).await);

    assert_eq!(poll.token(), Some("PROGRESS"));
    assert_eq!(poll.extra.get("progress"), Some(&json!(55)));
    assert!(!poll.has_payload());
}

#[tokio::test]
async fn test_job_status_encodes_handle_as_one_segment() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/a%2Fb%3Fx=1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "PENDING" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = MediaClient::new(server.uri());
    let poll = assert_ok!(client.job_status(&JobHandle::from("a/b?x=1")).await);
    assert_eq!(poll.token(), Some("PENDING"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/api/tasks/a%2Fb%3Fx=1");
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_unknown_job_is_not_found() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such task"))
        .mount(&server)
        .await;

    let client = MediaClient::new(server.uri());
    let err = client.job_status(&JobHandle::from("gone")).await.unwrap_err();

    assert!(err.is_not_found());
    assert!(!err.is_server_error());
}

#[tokio::test]
async fn test_error_status_maps_to_api_error() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/crop"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let client = MediaClient::new(server.uri());
    let err = client.start_job(Tool::Crop, &json!({})).await.unwrap_err();

    assert!(err.is_server_error());
    assert!(!err.is_not_found());
    match err {
        ClientError::ApiError { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, "upstream down");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_invalid_json_maps_to_parse_error() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = MediaClient::new(server.uri());
    let err = client.job_status(&JobHandle::from("abc")).await.unwrap_err();

    assert!(matches!(err, ClientError::ParseError(_)));
}

#[tokio::test]
async fn test_task_request_polls_until_success() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/resize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "job-42" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/job-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "state": "PENDING" })))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/job-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": "SUCCESS",
            "result": { "url": "/files/job-42.gif" },
        })))
        .mount(&server)
        .await;

    let client = MediaClient::new(server.uri());
    let poller = instant_poller::<Value>(10);

    let output = assert_ok!(
        poller
            .run_task(client.task_request(Tool::Resize, json!({ "width": 320 })))
            .await
    );

    assert_eq!(output, json!({ "url": "/files/job-42.gif" }));
    assert_eq!(poller.status(), PollerStatus::Success);
    assert_eq!(poller.attempts(), 3);

    let requests = server.received_requests().await.unwrap_or_default();
    let polls = requests
        .iter()
        .filter(|r| r.url.path() == "/api/tasks/job-42")
        .count();
    assert_eq!(polls, 3);
}

#[tokio::test]
async fn test_task_request_surfaces_remote_failure() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/optimize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(5)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": "FAILURE",
            "error": "unsupported codec",
        })))
        .mount(&server)
        .await;

    let client = MediaClient::new(server.uri());
    let poller = instant_poller::<Value>(10);

    let err = poller
        .run_task(client.task_request(Tool::Optimize, json!({})))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Remote);
    assert_eq!(err.to_string(), "unsupported codec");
    assert_eq!(poller.error().map(|e| e.message), Some("unsupported codec".to_string()));
}

#[tokio::test]
async fn test_task_request_status_error_is_transport_failure() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/add-text"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "taskId": "gone" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such task"))
        .expect(1)
        .mount(&server)
        .await;

    let client = MediaClient::new(server.uri());
    let poller = instant_poller::<Value>(10);

    let err = poller
        .run_task(client.task_request(Tool::AddText, json!({ "text": "hi" })))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_task_request_without_handle_never_polls() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/gif-maker"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "taskId": "" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "state": "PENDING" })))
        .expect(0)
        .mount(&server)
        .await;

    let client = MediaClient::new(server.uri());
    let poller = instant_poller::<Value>(10);

    let err = poller
        .run_task(client.task_request(Tool::GifMaker, json!({ "frames": [] })))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MissingTaskId);
}
