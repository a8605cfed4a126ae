use async_trait::async_trait;
use serde_json::Value;

use super::{Middleware, Next};
use crate::error::Error;
use crate::request::Request;
use crate::response::Response;

/// Parses JSON request bodies into [`Request::json`].
///
/// Only bodies declared as `application/json` (or any `+json` type) are
/// parsed; anything else passes through untouched and reads as "no body".
/// Like most JSON body parsers the top level must be an object or an array.
/// A body that fails to parse is an [`Error`], not a client response, so it
/// ends up at the application's error handler.
pub struct JsonBody;

#[async_trait]
impl Middleware for JsonBody {
    async fn handle(&self, mut req: Request, next: Next) -> Result<Response, Error> {
        if is_json(req.header("content-type")) && !req.body().is_empty() {
            let value: Value = serde_json::from_slice(req.body())?;
            if !(value.is_object() || value.is_array()) {
                let err = <serde_json::Error as serde::de::Error>::custom(
                    "top-level JSON value must be an object or array",
                );
                return Err(err.into());
            }
            req.set_json(value);
        }
        next(req).await
    }
}

fn is_json(content_type: Option<&str>) -> bool {
    let Some(content_type) = content_type else { return false };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}
