use async_trait::async_trait;
use tracing::info;

use super::{Middleware, Next};
use crate::error::Error;
use crate::request::Request;
use crate::response::Response;

/// Emits one `INFO` event per request, carrying its method and path, before
/// handing the request on. Observes only; the response is whatever the rest
/// of the chain produces.
pub struct RequestLogger;

#[async_trait]
impl Middleware for RequestLogger {
    async fn handle(&self, req: Request, next: Next) -> Result<Response, Error> {
        info!(method = %req.method(), path = %req.path(), "request");
        next(req).await
    }
}
