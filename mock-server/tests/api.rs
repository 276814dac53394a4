use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_users, Echo, ErrorBody, Page, User};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

fn seeded() -> axum::Router {
    app_with_users(vec![
        User {
            id: "1".to_string(),
            name: "Ann".to_string(),
        },
        User {
            id: "2".to_string(),
            name: "Bob".to_string(),
        },
        User {
            id: "3".to_string(),
            name: "Cy".to_string(),
        },
    ])
}

// --- ping ---

#[tokio::test]
async fn ping_returns_pong() {
    let resp = app().oneshot(empty_request("GET", "/ping")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let pong: String = body_json(resp).await;
    assert_eq!(pong, "pong");
}

// --- users ---

#[tokio::test]
async fn list_users_empty() {
    let resp = app().oneshot(empty_request("GET", "/users")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let users: Vec<User> = body_json(resp).await;
    assert!(users.is_empty());
}

#[tokio::test]
async fn get_seeded_user() {
    let resp = seeded().oneshot(empty_request("GET", "/users/1")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let user: User = body_json(resp).await;
    assert_eq!(user.name, "Ann");
}

#[tokio::test]
async fn get_missing_user_returns_404_with_error_body() {
    let resp = seeded()
        .oneshot(empty_request("GET", "/users/999"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.message, "user not found");
    assert_eq!(body.code.as_deref(), Some("not_found"));
}

#[tokio::test]
async fn create_user_returns_201() {
    let resp = app()
        .oneshot(json_request("POST", "/users", r#"{"name":"Bob"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let user: User = body_json(resp).await;
    assert_eq!(user.name, "Bob");
    assert!(!user.id.is_empty());
}

#[tokio::test]
async fn create_user_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/users", r#"{"nom":"Bob"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn replace_missing_user_returns_404() {
    let resp = app()
        .oneshot(json_request("PUT", "/users/1", r#"{"name":"Nope"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_user_returns_204_with_empty_body() {
    let resp = seeded()
        .oneshot(empty_request("DELETE", "/users/2"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());
}

// --- pagination ---

#[tokio::test]
async fn page_users_slices_in_id_order() {
    let resp = seeded()
        .oneshot(empty_request("GET", "/users/page?page=2&page_size=2"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page: Page<User> = body_json(resp).await;
    assert_eq!(page.total, 3);
    assert_eq!(page.page, 2);
    assert_eq!(page.page_size, 2);
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].id, "3");
}

#[tokio::test]
async fn page_zero_is_rejected() {
    let resp = seeded()
        .oneshot(empty_request("GET", "/users/page?page=0"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- echo ---

#[tokio::test]
async fn echo_reports_body_and_content_type() {
    let resp = app()
        .oneshot(json_request("POST", "/echo", r#"{"name":"Bob"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.content_type.as_deref(), Some("application/json"));
    assert_eq!(echo.body, serde_json::json!({"name": "Bob"}));
}

#[tokio::test]
async fn echo_rejects_non_json() {
    let resp = app()
        .oneshot(json_request("PUT", "/echo", "not json"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- forced status ---

#[tokio::test]
async fn forced_status_uses_requested_code() {
    for (method, code) in [("GET", 404), ("POST", 500), ("DELETE", 409)] {
        let resp = app()
            .oneshot(empty_request(method, &format!("/status/{code}")))
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), code);
        let body: ErrorBody = body_json(resp).await;
        assert_eq!(body.code.as_deref(), Some("forced"));
    }
}

// --- full lifecycle ---

#[tokio::test]
async fn user_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/users", r#"{"name":"Ann"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: User = body_json(resp).await;
    let id = created.id;

    // replace
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/users/{id}"),
            r#"{"name":"Ann B"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let replaced: User = body_json(resp).await;
    assert_eq!(replaced.name, "Ann B");

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("/users/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // get after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/users/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
