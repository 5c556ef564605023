/**
 * Contact Routes
 * Messages sent through the site's contact form
 */
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::db::models::ContactMessage;
use crate::error::AppError;
use crate::routes::{all_present, payload_object, MessageResponse};
use crate::state::AppState;

const FIELDS: &[&str] = &["name", "email", "message"];
const BAD_REQUEST_MESSAGE: &str = "All fields are required";
const CREATED_MESSAGE: &str = "Message sent successfully";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessageResponse {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl From<ContactMessage> for ContactMessageResponse {
    fn from(message: ContactMessage) -> Self {
        Self {
            id: message.id.map(|id| id.to_hex()),
            name: message.name,
            email: message.email,
            message: message.message,
            created_at: message.created_at.to_chrono(),
        }
    }
}

/// GET /api/contact - All contact messages, newest first
pub async fn list_messages(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContactMessageResponse>>, AppError> {
    let messages = state.messages.list().await?;
    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

/// POST /api/contact - Store a contact message
/// Only name, email and message are kept; anything else in the body is dropped.
pub async fn create_message(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload = payload_object(payload, BAD_REQUEST_MESSAGE)?;

    if !all_present(&payload, FIELDS) {
        return Err(AppError::BadRequest(BAD_REQUEST_MESSAGE.to_string()));
    }

    let mut fields = Map::new();
    for field in FIELDS {
        if let Some(value) = payload.get(*field) {
            fields.insert(field.to_string(), value.clone());
        }
    }

    state.messages.create(&fields).await?;
    tracing::info!("contact message received");

    let body = Json(MessageResponse::new(CREATED_MESSAGE));
    Ok((StatusCode::CREATED, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{get_json, post_json};
    use axum::routing::get;
    use axum::Router;
    use serde_json::json;

    fn test_router(state: AppState) -> Router {
        Router::new()
            .route("/api/contact", get(list_messages).post(create_message))
            .with_state(state)
    }

    #[tokio::test]
    async fn test_list_empty_returns_array() {
        let (status, body) = get_json(test_router(AppState::in_memory()), "/api/contact").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_extra_fields_are_dropped() {
        let state = AppState::in_memory();
        let payload = json!({
            "name": "A",
            "email": "a@b.com",
            "message": "hi",
            "phone": "999"
        });

        let (status, body) = post_json(test_router(state.clone()), "/api/contact", payload).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], CREATED_MESSAGE);

        let (_, body) = get_json(test_router(state), "/api/contact").await;
        let record = body[0].as_object().unwrap();
        let mut keys: Vec<&str> = record.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["createdAt", "email", "message", "name"]);
        assert_eq!(record["message"], "hi");
    }

    #[tokio::test]
    async fn test_missing_field_is_rejected() {
        let state = AppState::in_memory();
        let payload = json!({ "name": "A", "email": "a@b.com" });
        let (status, body) = post_json(test_router(state.clone()), "/api/contact", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], BAD_REQUEST_MESSAGE);

        let (_, body) = get_json(test_router(state), "/api/contact").await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_non_object_body_is_rejected() {
        let app = test_router(AppState::in_memory());
        let (status, _) = post_json(app, "/api/contact", json!("hello")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
