//! Integration tests for the to-do HTTP client

#![cfg(feature = "client")]

use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use todo_http::client::{
    ApiRequest, AuthenticatedTodoClient, ClientConfig, ClientError, PublicTodoClient, TokenStore,
    TypedClientBuilder,
};
use todo_http::types::{
    LoginRequest, PaginationParams, RegisterRequest, Todo, TodoCreate, TodoFilter, TodoReorder,
    TodoReorderRequest, TodoStatus,
};
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn todo_json(id: i64, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "status": "pending",
        "is_bookmarked": false,
        "order": 0,
        "parent_id": null,
        "user_id": 1,
        "created_at": "2024-05-01T10:00:00Z",
        "updated_at": "2024-05-01T10:00:00Z",
        "subtasks": []
    })
}

fn authenticated(server: &MockServer, tokens: &TokenStore) -> AuthenticatedTodoClient {
    AuthenticatedTodoClient::new(&ClientConfig::new(server.uri()), tokens.clone()).unwrap()
}

#[tokio::test]
async fn test_client_builder() {
    let client = TypedClientBuilder::new()
        .base_url("http://localhost:8000/")
        .build_public();

    assert!(client.is_ok());
    assert_eq!(client.unwrap().api_root(), "http://localhost:8000/api/v1");
}

#[tokio::test]
async fn test_client_builder_requires_base_url() {
    let result = TypedClientBuilder::new().build_public();
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/todos/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(todo_json(7, "Water plants")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = authenticated(&mock_server, &TokenStore::new());
    let todo = client.get_todo(7).await.unwrap();
    assert_eq!(todo.title, "Water plants");

    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(!received[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/todos"))
        .and(header("authorization", "Bearer current-token"))
        .and(query_param("status", "completed"))
        .and(query_param("page", "2"))
        .and(query_param("page_size", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [todo_json(1, "Done thing")],
            "total_count": 6,
            "page": 2,
            "page_size": 5
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let tokens = TokenStore::new();
    tokens.set("current-token");
    let client = authenticated(&mock_server, &tokens);

    let filter = TodoFilter {
        status: Some(TodoStatus::Completed),
        ..Default::default()
    };
    let pagination = PaginationParams {
        page: 2,
        page_size: 5,
        ..Default::default()
    };
    let page = client.list_todos(&filter, &pagination).await.unwrap();
    assert_eq!(page.total_count, 6);
    assert_eq!(page.items.len(), 1);
}

#[tokio::test]
async fn test_single_401_refreshes_once_and_resubmits_with_new_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/todos/1"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Token expired"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/todos/1"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(todo_json(1, "Buy milk")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh",
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let tokens = TokenStore::new();
    tokens.set("stale");
    let rotations = Arc::new(AtomicUsize::new(0));
    let counter = rotations.clone();
    let client = authenticated(&mock_server, &tokens).with_refresh_hook(Arc::new(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    let todo: Todo = client.get_todo(1).await.unwrap();
    assert_eq!(todo.title, "Buy milk");
    assert_eq!(tokens.get().as_deref(), Some("fresh"));
    assert_eq!(rotations.load(Ordering::SeqCst), 1);

    // The refresh call itself must not carry the stale bearer token
    let received = mock_server.received_requests().await.unwrap();
    let refresh = received
        .iter()
        .find(|request| request.url.path() == "/api/v1/auth/refresh")
        .unwrap();
    assert!(!refresh.headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_second_401_is_propagated_without_another_refresh() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/todos/1"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Not authenticated"))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "also-rejected",
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let tokens = TokenStore::new();
    tokens.set("stale");
    let client = authenticated(&mock_server, &tokens);

    let result = client.get_todo(1).await;
    assert!(matches!(result, Err(ClientError::Unauthorized(_))));
    assert_eq!(tokens.get().as_deref(), Some("also-rejected"));
}

#[tokio::test]
async fn test_refresh_failure_is_propagated_without_resubmitting() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/todos/4"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid refresh token"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let tokens = TokenStore::new();
    tokens.set("stale");
    let client = authenticated(&mock_server, &tokens);

    let error = client.delete_todo(4).await.unwrap_err();
    match error {
        ClientError::Unauthorized(message) => {
            assert_eq!(message, "Invalid refresh token")
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(tokens.get().as_deref(), Some("stale"));
}

#[tokio::test]
async fn test_other_errors_pass_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/todos/99"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Todo not found"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let tokens = TokenStore::new();
    tokens.set("valid");
    let client = authenticated(&mock_server, &tokens);

    let result = client.get_todo(99).await;
    assert!(matches!(result, Err(ClientError::NotFound(_))));
}

#[tokio::test]
async fn test_login_is_form_encoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=alice"))
        .and(body_string_contains("password=secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "issued",
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = PublicTodoClient::new(&ClientConfig::new(mock_server.uri())).unwrap();
    let response = client
        .login(&LoginRequest {
            username: "alice".into(),
            password: "secret".into(),
        })
        .await
        .unwrap();
    assert_eq!(response.access_token, "issued");
    assert_eq!(response.token_type, "bearer");
}

#[tokio::test]
async fn test_bad_credentials_do_not_trigger_refresh() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Incorrect username or password"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = PublicTodoClient::new(&ClientConfig::new(mock_server.uri())).unwrap();
    let result = client
        .login(&LoginRequest {
            username: "alice".into(),
            password: "wrong".into(),
        })
        .await;
    assert!(matches!(result, Err(ClientError::Unauthorized(_))));
}

#[tokio::test]
async fn test_register_sends_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2,
            "username": "bob",
            "email": "bob@example.com",
            "name": "Bob",
            "is_active": true
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = PublicTodoClient::new(&ClientConfig::new(mock_server.uri())).unwrap();
    let user = client
        .register(&RegisterRequest {
            username: "bob".into(),
            email: "bob@example.com".into(),
            name: "Bob".into(),
            password: "hunter22".into(),
        })
        .await
        .unwrap();
    assert_eq!(user.id, 2);
    assert_eq!(user.is_active, Some(true));
}

fn bob() -> RegisterRequest {
    RegisterRequest {
        username: "bob".into(),
        email: "bob@example.com".into(),
        name: "Bob".into(),
        password: "hunter22".into(),
    }
}

#[tokio::test]
async fn test_error_envelope_message_is_extracted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Username already registered"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = PublicTodoClient::new(&ClientConfig::new(mock_server.uri())).unwrap();
    let error = client.register(&bob()).await.unwrap_err();
    match error {
        ClientError::Rejected(message) => assert_eq!(message, "Username already registered"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unprocessable_input_is_rejected_with_field_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [{
                "loc": ["body", "email"],
                "msg": "value is not a valid email address",
                "type": "value_error.email"
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = PublicTodoClient::new(&ClientConfig::new(mock_server.uri())).unwrap();
    let error = client.register(&bob()).await.unwrap_err();
    match error {
        ClientError::Rejected(message) => {
            assert_eq!(message, "email: value is not a valid email address")
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_input_is_rejected_before_sending() {
    let mock_server = MockServer::start().await;
    let client = authenticated(&mock_server, &TokenStore::new());

    let result = client
        .create_todo(&TodoCreate {
            title: "   ".into(),
            ..Default::default()
        })
        .await;
    assert!(matches!(result, Err(ClientError::Validation(_))));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_public_execute_sends_no_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/logout"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let tokens = TokenStore::new();
    tokens.set("held");
    let client = authenticated(&mock_server, &tokens);
    client
        .to_public()
        .execute_empty(ApiRequest::post("/auth/logout"))
        .await
        .unwrap();

    let received = mock_server.received_requests().await.unwrap();
    assert!(!received[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_reorder_posts_new_positions() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/todos/reorder"))
        .and(body_json(json!({
            "reorders": [
                {"todo_id": 2, "new_order": 0},
                {"todo_id": 1, "new_order": 1}
            ]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([todo_json(2, "second"), todo_json(1, "first")])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let tokens = TokenStore::new();
    tokens.set("valid");
    let client = authenticated(&mock_server, &tokens);
    let todos = client
        .reorder_todos(&TodoReorderRequest {
            reorders: vec![
                TodoReorder {
                    todo_id: 2,
                    new_order: 0,
                },
                TodoReorder {
                    todo_id: 1,
                    new_order: 1,
                },
            ],
            parent_id: None,
        })
        .await
        .unwrap();

    assert_eq!(
        todos.iter().map(|todo| todo.id).collect::<Vec<_>>(),
        vec![2, 1]
    );
}
