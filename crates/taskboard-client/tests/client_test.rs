//! REST client integration tests against a mock HTTP server

use serde_json::json;
use taskboard_client::{ApiClient, ClientConfig, ClientError, TaskStatus};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(ClientConfig {
        base_url: server.uri(),
        token: Some("tok-123".into()),
        timeout_secs: 5,
    })
    .expect("client builds")
}

fn task_json(id: &str, status: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "title": "Deploy",
        "status": status,
        "priority": "High",
        "project": "p1",
        "assignees": [],
        "watchers": [],
        "isArchived": false,
        "subtasks": []
    })
}

#[tokio::test]
async fn test_get_my_tasks_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks/my-tasks"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([task_json("t1", "To Do")])))
        .expect(1)
        .mount(&server)
        .await;

    let tasks = client_for(&server).get_my_tasks().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status, TaskStatus::Todo);
}

#[tokio::test]
async fn test_update_status_puts_field_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/tasks/t1/status"))
        .and(body_json(json!({"status": "Done"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json("t1", "Done")))
        .expect(1)
        .mount(&server)
        .await;

    let task = client_for(&server)
        .update_task_field("t1", "status", json!("Done"))
        .await
        .unwrap();
    assert_eq!(task.status, TaskStatus::Done);
}

#[tokio::test]
async fn test_server_error_message_surfaces_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tasks/t1/add-comment"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"message": "You are not a member of this project"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).add_comment("t1", "hi").await.unwrap_err();
    assert_eq!(err.user_message(), "You are not a member of this project");
    assert!(matches!(err, ClientError::Server { status: 403, .. }));
}

#[tokio::test]
async fn test_not_found_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server).get_task("missing").await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks/my-tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
        .mount(&server)
        .await;

    let err = client_for(&server).get_my_tasks().await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(_)));
}
