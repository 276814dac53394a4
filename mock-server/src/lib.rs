use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{any, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub name: String,
}

#[derive(Deserialize)]
pub struct ReplaceUser {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn first_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// What `/echo` saw: the request's content type and its decoded JSON body.
#[derive(Debug, Serialize, Deserialize)]
pub struct Echo {
    pub content_type: Option<String>,
    pub body: Value,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ErrorBody>)>;

pub type Db = Arc<RwLock<BTreeMap<String, User>>>;

pub fn app() -> Router {
    app_with_users(Vec::new())
}

/// Router whose user table starts with `users`.
pub fn app_with_users(users: Vec<User>) -> Router {
    let db: Db = Arc::new(RwLock::new(
        users.into_iter().map(|u| (u.id.clone(), u)).collect(),
    ));
    Router::new()
        .route("/ping", get(ping))
        .route("/users", get(list_users).post(create_user))
        .route("/users/page", get(page_users))
        .route("/users/{id}", get(get_user).put(replace_user).delete(delete_user))
        .route("/echo", post(echo).put(echo))
        .route("/status/{code}", any(forced_status))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

fn error(status: StatusCode, message: &str, code: &str) -> (StatusCode, Json<ErrorBody>) {
    (
        status,
        Json(ErrorBody {
            message: message.to_string(),
            code: Some(code.to_string()),
        }),
    )
}

fn not_found(id: &str) -> (StatusCode, Json<ErrorBody>) {
    tracing::debug!(%id, "user not found");
    error(StatusCode::NOT_FOUND, "user not found", "not_found")
}

async fn ping() -> Json<&'static str> {
    Json("pong")
}

async fn list_users(State(db): State<Db>) -> Json<Vec<User>> {
    let users = db.read().await;
    Json(users.values().cloned().collect())
}

async fn page_users(
    State(db): State<Db>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Page<User>>> {
    if query.page == 0 || query.page_size == 0 {
        return Err(error(
            StatusCode::BAD_REQUEST,
            "page and page_size must be positive",
            "invalid_page",
        ));
    }
    let users = db.read().await;
    let skip = (query.page as usize - 1) * query.page_size as usize;
    Ok(Json(Page {
        data: users
            .values()
            .skip(skip)
            .take(query.page_size as usize)
            .cloned()
            .collect(),
        total: users.len() as u64,
        page: query.page,
        page_size: query.page_size,
    }))
}

async fn create_user(
    State(db): State<Db>,
    Json(input): Json<CreateUser>,
) -> (StatusCode, Json<User>) {
    let user = User {
        id: Uuid::new_v4().to_string(),
        name: input.name,
    };
    tracing::info!(id = %user.id, "created user");
    db.write().await.insert(user.id.clone(), user.clone());
    (StatusCode::CREATED, Json(user))
}

async fn get_user(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Json<User>> {
    let users = db.read().await;
    users.get(&id).cloned().map(Json).ok_or_else(|| not_found(&id))
}

async fn replace_user(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<ReplaceUser>,
) -> ApiResult<Json<User>> {
    let mut users = db.write().await;
    let user = users.get_mut(&id).ok_or_else(|| not_found(&id))?;
    user.name = input.name;
    Ok(Json(user.clone()))
}

async fn delete_user(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let mut users = db.write().await;
    users
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| not_found(&id))
}

async fn echo(headers: HeaderMap, body: String) -> ApiResult<Json<Echo>> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = serde_json::from_str(&body)
        .map_err(|_| error(StatusCode::BAD_REQUEST, "body is not JSON", "invalid_json"))?;
    Ok(Json(Echo { content_type, body }))
}

async fn forced_status(Path(code): Path<u16>) -> (StatusCode, Json<ErrorBody>) {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    let message = status.canonical_reason().unwrap_or("unknown status");
    error(status, message, "forced")
}
