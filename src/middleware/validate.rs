use async_trait::async_trait;
use http::StatusCode;
use serde_json::Value;

use super::{Middleware, Next};
use crate::error::{error_response, validation_failed, Error};
use crate::model::{Field, ValidationErrors};
use crate::request::Request;
use crate::response::Response;

const NOTHING_TO_UPDATE: &str = "Request body must include at least one of firstName, lastName, hobby";

/// Rejects user payloads before they reach the controller.
///
/// [`create`](ValidateUser::create) demands all three fields as non-empty
/// strings. [`update`](ValidateUser::update) demands at least one, and every
/// field present must be a non-empty string. Failures answer `400` using the
/// schema's wording for each offending field; length rules are left to the
/// schema itself.
#[derive(Clone, Copy, Debug)]
pub struct ValidateUser {
    partial: bool,
}

impl ValidateUser {
    pub fn create() -> Self {
        Self { partial: false }
    }

    pub fn update() -> Self {
        Self { partial: true }
    }

    fn check(self, body: Option<&Value>) -> Result<(), Response> {
        let object = body.and_then(Value::as_object);
        let mut errors = ValidationErrors::new();
        let mut supplied = 0;

        for field in Field::ALL {
            let value = object.and_then(|o| o.get(field.key()));
            if value.is_some() {
                supplied += 1;
            } else if self.partial {
                continue;
            }
            if !matches!(value, Some(Value::String(s)) if !s.is_empty()) {
                errors.add(field, field.required_message());
            }
        }

        if !errors.is_empty() {
            return Err(validation_failed(&errors));
        }
        if supplied == 0 {
            return Err(error_response(StatusCode::BAD_REQUEST, NOTHING_TO_UPDATE));
        }
        Ok(())
    }
}

#[async_trait]
impl Middleware for ValidateUser {
    async fn handle(&self, req: Request, next: Next) -> Result<Response, Error> {
        match self.check(req.json()) {
            Ok(()) => next(req).await,
            Err(rejection) => Ok(rejection),
        }
    }
}
