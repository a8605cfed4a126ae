//! The user route table.

use std::future::Future;
use std::sync::Arc;

use http::Method;

use crate::controller::{self, SharedStore};
use crate::error::Error;
use crate::handler::Handler;
use crate::middleware::{guard, ValidateUser};
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;

/// User routes, relative to wherever the caller mounts them:
///
/// | Method | Path | Handler |
/// |---|---|---|
/// | GET | `/users` | list |
/// | GET | `/users/{id}` | get |
/// | POST | `/users` | validate, create |
/// | PUT | `/users/{id}` | validate, update |
/// | DELETE | `/users/{id}` | delete |
pub fn users(store: SharedStore) -> Router {
    Router::new()
        .on(Method::GET, "/users", with_store(&store, controller::list_users))
        .on(Method::GET, "/users/{id}", with_store(&store, controller::get_user))
        .on(
            Method::POST,
            "/users",
            guard(ValidateUser::create(), with_store(&store, controller::create_user)),
        )
        .on(
            Method::PUT,
            "/users/{id}",
            guard(ValidateUser::update(), with_store(&store, controller::update_user)),
        )
        .on(Method::DELETE, "/users/{id}", with_store(&store, controller::delete_user))
}

/// Binds the store handle to a controller action, producing a plain handler.
fn with_store<F, Fut>(store: &SharedStore, action: F) -> impl Handler
where
    F: Fn(SharedStore, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, Error>> + Send + 'static,
{
    let store = Arc::clone(store);
    move |req: Request| action(Arc::clone(&store), req)
}
