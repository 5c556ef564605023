/**
 * Routes Module
 * API route handlers for donors, blood requests and contact messages
 */

pub mod contact;
pub mod donors;
pub mod frontend;
pub mod health;
pub mod requests;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;

pub const API_PREFIX: &str = "/api";

/// `{ "message": ... }` body used for acknowledgements and errors alike
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Unwrap a JSON body into an object. Malformed JSON and non-object bodies
/// are rejected with the endpoint's own bad-request message.
pub fn payload_object(
    payload: Result<Json<Value>, JsonRejection>,
    bad_request: &'static str,
) -> Result<Map<String, Value>, AppError> {
    match payload {
        Ok(Json(Value::Object(map))) => Ok(map),
        Ok(Json(_)) => Err(AppError::BadRequest(bad_request.to_string())),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected request body");
            Err(AppError::BadRequest(bad_request.to_string()))
        }
    }
}

/// Presence test for required fields: absent, `null`, `false`, `0`, `NaN` and
/// `""` all count as missing. Zero is deliberately missing, so `units: 0` is
/// refused.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Fallback for paths no route matches.
pub async fn not_found() -> AppError {
    AppError::NotFound
}

pub fn all_present(payload: &Map<String, Value>, fields: &[&str]) -> bool {
    fields
        .iter()
        .all(|field| payload.get(*field).is_some_and(is_truthy))
}
