//! User CRUD handlers.
//!
//! Each handler receives the shared store handle and the request. Client
//! mistakes (schema violations, unknown ids) are answered here; store
//! failures bubble up as [`Error`] to the application's error handler.

use std::sync::Arc;

use http::StatusCode;
use serde::Deserialize;
use serde_json::json;

use crate::error::{error_response, validation_failed, Error};
use crate::model::UserInput;
use crate::request::Request;
use crate::response::{IntoResponse, Json, Response};
use crate::store::UserStore;

/// The store handle every handler shares.
pub type SharedStore = Arc<dyn UserStore>;

/// `GET /users`
pub async fn list_users(store: SharedStore, _req: Request) -> Result<Response, Error> {
    let users = store.list().await?;
    Ok(Json(users).into_response())
}

/// `GET /users/{id}`
pub async fn get_user(store: SharedStore, req: Request) -> Result<Response, Error> {
    match store.find(id(&req)).await? {
        Some(user) => Ok(Json(user).into_response()),
        None => Ok(user_not_found()),
    }
}

/// `POST /users`
pub async fn create_user(store: SharedStore, req: Request) -> Result<Response, Error> {
    let input = match user_input(&req) {
        Ok(input) => input,
        Err(rejection) => return Ok(rejection),
    };
    let new_user = match input.into_new_user() {
        Ok(user) => user,
        Err(errors) => return Ok(validation_failed(&errors)),
    };
    let user = store.insert(new_user).await?;
    let location = format!("/api/users/{}", user.id);
    Ok(Response::builder()
        .status(StatusCode::CREATED)
        .header("location", &location)
        .json(serde_json::to_vec(&user)?))
}

/// `PUT /users/{id}`
pub async fn update_user(store: SharedStore, req: Request) -> Result<Response, Error> {
    let input = match user_input(&req) {
        Ok(input) => input,
        Err(rejection) => return Ok(rejection),
    };
    let patch = match input.into_patch() {
        Ok(patch) => patch,
        Err(errors) => return Ok(validation_failed(&errors)),
    };
    match store.update(id(&req), patch).await? {
        Some(user) => Ok(Json(user).into_response()),
        None => Ok(user_not_found()),
    }
}

/// `DELETE /users/{id}`
pub async fn delete_user(store: SharedStore, req: Request) -> Result<Response, Error> {
    if store.delete(id(&req)).await? {
        Ok(Response::json(json!({ "message": "User deleted" }).to_string().into_bytes()))
    } else {
        Ok(user_not_found())
    }
}

fn id(req: &Request) -> &str {
    req.param("id").unwrap_or_default()
}

fn user_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "User not found")
}

/// Reads the parsed body as user fields. No body reads as no fields.
fn user_input(req: &Request) -> Result<UserInput, Response> {
    match req.json() {
        None => Ok(UserInput::default()),
        Some(value) => UserInput::deserialize(value)
            .map_err(|_| error_response(StatusCode::BAD_REQUEST, "Invalid user payload")),
    }
}
