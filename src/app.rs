//! The application shell.
//!
//! Wires the global middleware, the informational routes, the user API under
//! `/api`, the 404 fallback and the last-resort error handler into a single
//! [`App`] the server can drive.

use std::sync::Arc;

use bytes::Bytes;
use http::{Method, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Body;
use tracing::error;

use crate::controller::SharedStore;
use crate::error::{internal_error, BoxError, Error};
use crate::middleware::{JsonBody, Pipeline, RequestLogger};
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::routes;

const WELCOME: &str = "Welcome to the User API with MongoDB! Use /api/users";

/// The whole HTTP application.
///
/// Requests pass through, in order: JSON body parsing, request logging, the
/// router. Anything the router does not know answers
/// `404 {"error":"Route not found"}`. Any [`Error`] raised along the way is
/// logged and answered with a generic `500`.
///
/// ```rust
/// use std::sync::Arc;
/// use roster::{App, MemoryStore};
///
/// let app = App::new(Arc::new(MemoryStore::new()));
/// ```
#[derive(Clone)]
pub struct App {
    pipeline: Pipeline,
}

impl App {
    pub fn new(store: SharedStore) -> Self {
        let router = Arc::new(
            Router::new()
                .on(Method::GET, "/", welcome)
                .on(Method::GET, "/favicon.ico", favicon)
                .nest("/api", routes::users(store)),
        );
        let endpoint = move |req: Request| {
            let router = Arc::clone(&router);
            async move { router.route(req).await }
        };
        let pipeline = Pipeline::new(endpoint)
            .stage(JsonBody)
            .stage(RequestLogger);
        Self { pipeline }
    }

    /// Runs one request through the application. Never fails: errors become
    /// `500` responses here.
    pub async fn handle(&self, req: Request) -> Response {
        match self.pipeline.run(req).await {
            Ok(res) => res,
            Err(err) => server_error(&err),
        }
    }

    /// Reads the body of an `http` request and handles it.
    pub async fn call<B>(&self, req: http::Request<B>) -> http::Response<Full<Bytes>>
    where
        B: Body<Data = Bytes> + Send,
        B::Error: Into<BoxError>,
    {
        let (parts, body) = req.into_parts();
        let res = match body.collect().await {
            Ok(collected) => {
                let req = Request::new(parts.method, parts.uri.path(), parts.headers, collected.to_bytes());
                self.handle(req).await
            }
            Err(e) => server_error(&Error::ReadBody(e.into())),
        };
        res.into_inner()
    }
}

async fn welcome(_req: Request) -> &'static str {
    WELCOME
}

async fn favicon(_req: Request) -> Response {
    Response::builder().status(StatusCode::NO_CONTENT).no_body()
}

fn server_error(err: &Error) -> Response {
    error!(error = %err, detail = ?err, "server error");
    internal_error()
}
