//! Middleware layer.
//!
//! Middleware intercepts a request on its way to the handler. Each stage
//! either forwards to the rest of the chain through [`Next`] or answers on
//! the spot. Stages run in the order they were added to a [`Pipeline`].
//!
//! Built-in middleware:
//! - [`JsonBody`]: parses JSON request bodies
//! - [`RequestLogger`]: one `tracing` event per request
//! - [`ValidateUser`]: rejects user payloads missing required fields

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Error;
use crate::handler::{BoxFuture, BoxedHandler, Handler};
use crate::request::Request;
use crate::response::Response;

mod body;
mod logger;
mod validate;

pub use body::JsonBody;
pub use logger::RequestLogger;
pub use validate::ValidateUser;

/// The remainder of the chain, called at most once.
pub type Next = Box<dyn FnOnce(Request) -> BoxFuture + Send>;

/// A pipeline stage.
///
/// ```rust
/// use async_trait::async_trait;
/// use roster::middleware::{Middleware, Next};
/// use roster::{Error, Request, Response};
///
/// struct PoweredBy;
///
/// #[async_trait]
/// impl Middleware for PoweredBy {
///     async fn handle(&self, req: Request, next: Next) -> Result<Response, Error> {
///         let mut res = next(req).await?;
///         res.set_header("x-powered-by", "roster");
///         Ok(res)
///     }
/// }
/// ```
#[async_trait]
pub trait Middleware: Send + Sync + 'static {
    async fn handle(&self, req: Request, next: Next) -> Result<Response, Error>;
}

/// An ordered chain of middleware in front of one endpoint.
#[derive(Clone)]
pub struct Pipeline {
    stages: Arc<Vec<Arc<dyn Middleware>>>,
    endpoint: BoxedHandler,
}

impl Pipeline {
    pub fn new(endpoint: impl Handler) -> Self {
        Self { stages: Arc::new(Vec::new()), endpoint: endpoint.into_boxed_handler() }
    }

    /// Appends a stage. Stages added earlier run first.
    pub fn stage(mut self, middleware: impl Middleware) -> Self {
        Arc::make_mut(&mut self.stages).push(Arc::new(middleware));
        self
    }

    /// Runs `req` through every stage and then the endpoint.
    pub fn run(&self, req: Request) -> BoxFuture {
        self.run_from(0, req)
    }

    fn run_from(&self, index: usize, req: Request) -> BoxFuture {
        let Some(stage) = self.stages.get(index) else {
            return self.endpoint.call(req);
        };
        let stage = Arc::clone(stage);
        let rest = self.clone();
        Box::pin(async move {
            stage.handle(req, Box::new(move |req: Request| rest.run_from(index + 1, req))).await
        })
    }
}

/// Puts `middleware` in front of a single route's handler.
///
/// ```rust
/// # use http::Method;
/// # use roster::{middleware, Request, Response, Router};
/// # async fn create_user(_: Request) -> Response { Response::text("") }
/// Router::new().on(
///     Method::POST,
///     "/users",
///     middleware::guard(middleware::ValidateUser::create(), create_user),
/// );
/// ```
pub fn guard(middleware: impl Middleware, handler: impl Handler) -> impl Handler {
    let pipeline = Pipeline::new(handler).stage(middleware);
    move |req: Request| pipeline.run(req)
}
