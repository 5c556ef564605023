/**
 * Blood Request Routes
 * Submission and listing of blood requests
 */
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::models::BloodRequest;
use crate::error::AppError;
use crate::routes::{all_present, payload_object, MessageResponse};
use crate::state::AppState;

/// `units` goes through the same truthiness test, so zero counts as missing.
const REQUIRED_FIELDS: &[&str] = &[
    "patientName",
    "bloodGroup",
    "units",
    "hospital",
    "contactPhone",
];
const BAD_REQUEST_MESSAGE: &str = "All required fields must be filled";
const CREATED_MESSAGE: &str = "Blood request submitted successfully";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodRequestResponse {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub patient_name: String,
    pub blood_group: String,
    pub units: f64,
    pub hospital: String,
    pub contact_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<BloodRequest> for BloodRequestResponse {
    fn from(request: BloodRequest) -> Self {
        Self {
            id: request.id.map(|id| id.to_hex()),
            patient_name: request.patient_name,
            blood_group: request.blood_group,
            units: request.units,
            hospital: request.hospital,
            contact_phone: request.contact_phone,
            additional_info: request.additional_info,
            created_at: request.created_at.to_chrono(),
        }
    }
}

/// GET /api/requests - All blood requests, newest first
pub async fn list_requests(
    State(state): State<AppState>,
) -> Result<Json<Vec<BloodRequestResponse>>, AppError> {
    let requests = state.requests.list().await?;
    Ok(Json(requests.into_iter().map(Into::into).collect()))
}

/// POST /api/requests - Submit a blood request
pub async fn create_request(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload = payload_object(payload, BAD_REQUEST_MESSAGE)?;

    if !all_present(&payload, REQUIRED_FIELDS) {
        return Err(AppError::BadRequest(BAD_REQUEST_MESSAGE.to_string()));
    }

    state.requests.create(&payload).await?;
    tracing::info!("blood request submitted");

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
            .route("/api/requests", get(list_requests).post(create_request))
            .with_state(state)
    }

    fn valid_request() -> Value {
        json!({
            "patientName": "Kiran",
            "bloodGroup": "O-",
            "units": 2,
            "hospital": "General Hospital",
            "contactPhone": "9222222222"
        })
    }

    #[tokio::test]
    async fn test_list_empty_returns_array() {
        let (status, body) = get_json(test_router(AppState::in_memory()), "/api/requests").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let state = AppState::in_memory();
        let mut payload = valid_request();
        payload["additionalInfo"] = json!("Surgery on Monday");

        let (status, body) = post_json(test_router(state.clone()), "/api/requests", payload).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], CREATED_MESSAGE);

        let (status, body) = get_json(test_router(state), "/api/requests").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["patientName"], "Kiran");
        assert_eq!(body[0]["units"].as_f64(), Some(2.0));
        assert_eq!(body[0]["additionalInfo"], "Surgery on Monday");
    }

    #[tokio::test]
    async fn test_zero_units_is_missing() {
        let state = AppState::in_memory();
        let mut payload = valid_request();
        payload["units"] = json!(0);

        let (status, body) = post_json(test_router(state.clone()), "/api/requests", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], BAD_REQUEST_MESSAGE);

        let (_, body) = get_json(test_router(state), "/api/requests").await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_each_required_field() {
        for field in REQUIRED_FIELDS {
            let mut payload = valid_request();
            payload.as_object_mut().unwrap().remove(*field);
            let app = test_router(AppState::in_memory());
            let (status, _) = post_json(app, "/api/requests", payload).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "field {field}");
        }
    }

    #[tokio::test]
    async fn test_non_numeric_units_fail_in_store() {
        let mut payload = valid_request();
        payload["units"] = json!("several");
        let app = test_router(AppState::in_memory());
        let (status, _) = post_json(app, "/api/requests", payload).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_newest_first() {
        let state = AppState::in_memory();
        for patient in ["p1", "p2"] {
            let mut payload = valid_request();
            payload["patientName"] = json!(patient);
            post_json(test_router(state.clone()), "/api/requests", payload).await;
        }
        let (_, body) = get_json(test_router(state), "/api/requests").await;
        assert_eq!(body[0]["patientName"], "p2");
        assert_eq!(body[1]["patientName"], "p1");
    }
}
