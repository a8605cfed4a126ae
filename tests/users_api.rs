use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::{Method, StatusCode};
use http_body_util::{BodyExt, Full};
use roster::{App, MemoryStore, NewUser, StoreError, User, UserPatch, UserStore};
use serde_json::{json, Value};

struct Reply {
    status: StatusCode,
    content_type: Option<String>,
    body: Bytes,
}

impl Reply {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("JSON body")
    }
}

fn app() -> App {
    App::new(Arc::new(MemoryStore::new()))
}

async fn send(app: &App, method: Method, uri: &str, body: Option<Value>) -> Reply {
    let mut req = http::Request::builder().method(method).uri(uri);
    let payload = match body {
        Some(value) => {
            req = req.header("content-type", "application/json");
            Bytes::from(value.to_string())
        }
        None => Bytes::new(),
    };
    let res = app.call(req.body(Full::new(payload)).unwrap()).await;
    let status = res.status();
    let content_type = res
        .headers()
        .get("content-type")
        .map(|v| v.to_str().unwrap().to_owned());
    let body = res.into_body().collect().await.unwrap().to_bytes();
    Reply { status, content_type, body }
}

async fn create(app: &App, first: &str, last: &str, hobby: &str) -> Value {
    let reply = send(
        app,
        Method::POST,
        "/api/users",
        Some(json!({"firstName": first, "lastName": last, "hobby": hobby})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    reply.json()
}

async fn list(app: &App) -> Vec<Value> {
    let reply = send(app, Method::GET, "/api/users", None).await;
    assert_eq!(reply.status, StatusCode::OK);
    reply.json().as_array().cloned().unwrap()
}

#[tokio::test]
async fn ada_lovelace_round_trip() {
    let app = app();

    let created = create(&app, "Ada", "Lovelace", "math").await;
    let id = created["id"].as_str().unwrap().to_owned();
    assert!(!id.is_empty());
    assert_eq!(created["firstName"], "Ada");
    assert_eq!(created["lastName"], "Lovelace");
    assert_eq!(created["hobby"], "math");

    let fetched = send(&app, Method::GET, &format!("/api/users/{id}"), None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.json(), created);

    let updated = send(&app, Method::PUT, &format!("/api/users/{id}"), Some(json!({"hobby": "chess"}))).await;
    assert_eq!(updated.status, StatusCode::OK);
    let updated = updated.json();
    assert_eq!(updated["hobby"], "chess");
    assert_eq!(updated["firstName"], "Ada");
    assert_eq!(updated["lastName"], "Lovelace");

    let deleted = send(&app, Method::DELETE, &format!("/api/users/{id}"), None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.json(), json!({"message": "User deleted"}));

    let gone = send(&app, Method::GET, &format!("/api/users/{id}"), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.json(), json!({"error": "User not found"}));
}

#[tokio::test]
async fn create_answers_json_with_location() {
    let app = app();
    let reply = send(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({"firstName": "Grace", "lastName": "Hopper", "hobby": "compilers", "role": "admin"})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.content_type.as_deref(), Some("application/json"));
    let user: User = serde_json::from_slice(&reply.body).unwrap();
    assert!(reply.json().get("role").is_none());
    assert_eq!(user.first_name, "Grace");
}

#[tokio::test]
async fn create_rejects_missing_fields_without_side_effects() {
    let app = app();
    let reply = send(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({"firstName": "Ada", "lastName": "Lovelace"})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    let body = reply.json();
    assert_eq!(body["fields"]["hobby"], "Hobby is required");
    assert!(body["error"].as_str().unwrap().contains("hobby"));
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn create_rejects_short_fields() {
    let app = app();
    let reply = send(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({"firstName": "A", "lastName": "Lovelace", "hobby": "math"})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    let body = reply.json();
    assert_eq!(
        body["fields"]["firstName"],
        "Path `firstName` (`A`) is shorter than the minimum allowed length (2).",
    );
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn create_without_a_json_body_is_rejected() {
    let app = app();
    let reply = send(&app, Method::POST, "/api/users", None).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    let fields = reply.json()["fields"].as_object().cloned().unwrap();
    assert_eq!(fields.len(), 3);
}

#[tokio::test]
async fn update_validates_supplied_fields_and_keeps_the_record() {
    let app = app();
    let created = create(&app, "Ada", "Lovelace", "math").await;
    let path = format!("/api/users/{}", created["id"].as_str().unwrap());

    let short = send(&app, Method::PUT, &path, Some(json!({"lastName": "L"}))).await;
    assert_eq!(short.status, StatusCode::BAD_REQUEST);
    assert!(short.json()["fields"]["lastName"].is_string());

    let empty = send(&app, Method::PUT, &path, Some(json!({}))).await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let fetched = send(&app, Method::GET, &path, None).await;
    assert_eq!(fetched.json(), created);
}

#[tokio::test]
async fn unknown_and_malformed_ids_are_not_found() {
    let app = app();
    create(&app, "Ada", "Lovelace", "math").await;

    for id in ["65a1f0c2e4b0a1b2c3d4e5f6", "123", "not-an-id"] {
        let path = format!("/api/users/{id}");
        let get = send(&app, Method::GET, &path, None).await;
        assert_eq!(get.status, StatusCode::NOT_FOUND, "GET {path}");
        let put = send(&app, Method::PUT, &path, Some(json!({"hobby": "chess"}))).await;
        assert_eq!(put.status, StatusCode::NOT_FOUND, "PUT {path}");
        let delete = send(&app, Method::DELETE, &path, None).await;
        assert_eq!(delete.status, StatusCode::NOT_FOUND, "DELETE {path}");
    }
    assert_eq!(list(&app).await.len(), 1);
}

#[tokio::test]
async fn list_tracks_creates_and_deletes() {
    let app = app();
    assert!(list(&app).await.is_empty());

    let ada = create(&app, "Ada", "Lovelace", "math").await;
    let grace = create(&app, "Grace", "Hopper", "compilers").await;
    assert_eq!(list(&app).await, vec![ada.clone(), grace.clone()]);

    let path = format!("/api/users/{}", ada["id"].as_str().unwrap());
    assert_eq!(send(&app, Method::DELETE, &path, None).await.status, StatusCode::OK);
    assert_eq!(send(&app, Method::DELETE, &path, None).await.status, StatusCode::NOT_FOUND);
    assert_eq!(send(&app, Method::DELETE, &path, None).await.status, StatusCode::NOT_FOUND);
    assert_eq!(list(&app).await, vec![grace]);
}

#[tokio::test]
async fn unmatched_routes_are_not_found() {
    let app = app();
    for (method, path) in [
        (Method::GET, "/api/unknown"),
        (Method::PATCH, "/api/users"),
        (Method::GET, "/users"),
    ] {
        let reply = send(&app, method, path, None).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert_eq!(reply.json(), json!({"error": "Route not found"}));
    }
}

#[tokio::test]
async fn root_and_favicon() {
    let app = app();
    let root = send(&app, Method::GET, "/", None).await;
    assert_eq!(root.status, StatusCode::OK);
    assert_eq!(&root.body[..], b"Welcome to the User API with MongoDB! Use /api/users");

    let favicon = send(&app, Method::GET, "/favicon.ico", None).await;
    assert_eq!(favicon.status, StatusCode::NO_CONTENT);
    assert!(favicon.body.is_empty());
}

#[tokio::test]
async fn malformed_json_reaches_the_error_handler() {
    let app = app();
    let req = http::Request::builder()
        .method(Method::POST)
        .uri("/api/users")
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from_static(b"{\"firstName\":")))
        .unwrap();
    let res = app.call(req).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = res.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], br#"{"error":"Something went wrong!"}"#);
}

// ── Store failures ───────────────────────────────────────────────────────────

/// A store whose database is gone.
struct Unreachable;

fn outage() -> StoreError {
    StoreError::Query(std::io::Error::other("connection refused by 10.0.0.7").into())
}

#[async_trait]
impl UserStore for Unreachable {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Err(outage())
    }

    async fn find(&self, _id: &str) -> Result<Option<User>, StoreError> {
        Err(outage())
    }

    async fn insert(&self, _user: NewUser) -> Result<User, StoreError> {
        Err(outage())
    }

    async fn update(&self, _id: &str, _patch: UserPatch) -> Result<Option<User>, StoreError> {
        Err(outage())
    }

    async fn delete(&self, _id: &str) -> Result<bool, StoreError> {
        Err(outage())
    }
}

#[tokio::test]
async fn store_failures_answer_a_generic_500() {
    let app = App::new(Arc::new(Unreachable));
    let id = "65a1f0c2e4b0a1b2c3d4e5f6";
    let cases = [
        (Method::GET, "/api/users".to_owned(), None),
        (Method::GET, format!("/api/users/{id}"), None),
        (
            Method::POST,
            "/api/users".to_owned(),
            Some(json!({"firstName": "Ada", "lastName": "Lovelace", "hobby": "math"})),
        ),
        (Method::PUT, format!("/api/users/{id}"), Some(json!({"hobby": "chess"}))),
        (Method::DELETE, format!("/api/users/{id}"), None),
    ];

    for (method, path, body) in cases {
        let reply = send(&app, method.clone(), &path, body).await;
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR, "{method} {path}");
        assert_eq!(reply.json(), json!({"error": "Something went wrong!"}));
        assert!(!String::from_utf8_lossy(&reply.body).contains("10.0.0.7"));
    }

    // Validation still answers before the store is consulted.
    let reply = send(&app, Method::POST, "/api/users", Some(json!({}))).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}
