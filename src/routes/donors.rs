/**
 * Donor Routes
 * Registration and listing of blood donors
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

use crate::db::models::Donor;
use crate::error::AppError;
use crate::routes::{all_present, payload_object, MessageResponse};
use crate::state::AppState;

const REQUIRED_FIELDS: &[&str] = &["name", "bloodGroup", "phone"];
const BAD_REQUEST_MESSAGE: &str = "Required fields missing or consent not given";
const CREATED_MESSAGE: &str = "Donor registered successfully";

/// Donor as returned by GET /api/donors
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorResponse {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    pub blood_group: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_donation_date: Option<DateTime<Utc>>,
    pub consent: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Donor> for DonorResponse {
    fn from(donor: Donor) -> Self {
        Self {
            id: donor.id.map(|id| id.to_hex()),
            name: donor.name,
            age: donor.age,
            gender: donor.gender,
            blood_group: donor.blood_group,
            phone: donor.phone,
            email: donor.email,
            address: donor.address,
            last_donation_date: donor.last_donation_date.map(|d| d.to_chrono()),
            consent: donor.consent,
            created_at: donor.created_at.to_chrono(),
        }
    }
}

/// GET /api/donors - All donors, newest first
pub async fn list_donors(
    State(state): State<AppState>,
) -> Result<Json<Vec<DonorResponse>>, AppError> {
    let donors = state.donors.list().await?;
    Ok(Json(donors.into_iter().map(DonorResponse::from).collect()))
}

/// POST /api/donors - Register a donor
pub async fn create_donor(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload = payload_object(payload, BAD_REQUEST_MESSAGE)?;

    let consented = payload.get("consent") == Some(&Value::Bool(true));
    if !all_present(&payload, REQUIRED_FIELDS) || !consented {
        return Err(AppError::BadRequest(BAD_REQUEST_MESSAGE.to_string()));
    }

    state.donors.create(&payload).await?;
    tracing::info!("donor registered");

    let body = Json(MessageResponse::new(CREATED_MESSAGE));
    Ok((StatusCode::CREATED, body))
}
