//! Database Models - documents stored in the `donors`, `requests` and
//! `contacts` collections.

use bson::oid::ObjectId;
use bson::DateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::schema::{self, SchemaError};

pub const GENDERS: &[&str] = &["Male", "Female", "Other"];
pub const MIN_DONOR_AGE: i64 = 18;
pub const MAX_DONOR_AGE: i64 = 65;

/// A document type with its own collection.
pub trait Record: Serialize + DeserializeOwned + Clone + Unpin + Send + Sync + 'static {
    const COLLECTION: &'static str;

    /// Cast a request payload into a document stamped with `created_at`.
    /// Unknown payload keys are dropped.
    fn from_payload(
        payload: &Map<String, Value>,
        created_at: DateTime,
    ) -> Result<Self, SchemaError>;

    fn created_at(&self) -> DateTime;
}

/// Donor model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donor {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    pub blood_group: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_donation_date: Option<DateTime>,
    pub consent: bool,
    pub created_at: DateTime,
}

impl Record for Donor {
    const COLLECTION: &'static str = "donors";

    fn from_payload(
        payload: &Map<String, Value>,
        created_at: DateTime,
    ) -> Result<Self, SchemaError> {
        Ok(Self {
            id: None,
            name: schema::required_string(payload, "name")?,
            age: schema::optional_bounded_int(payload, "age", MIN_DONOR_AGE, MAX_DONOR_AGE)?,
            gender: schema::optional_enum(payload, "gender", GENDERS)?,
            blood_group: schema::required_string(payload, "bloodGroup")?,
            phone: schema::required_string(payload, "phone")?,
            email: schema::optional_string(payload, "email")?,
            address: schema::optional_string(payload, "address")?,
            last_donation_date: schema::optional_date(payload, "lastDonationDate")?,
            consent: schema::required_bool(payload, "consent")?,
            created_at,
        })
    }

    fn created_at(&self) -> DateTime {
        self.created_at
    }
}

/// Blood request model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodRequest {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub patient_name: String,
    pub blood_group: String,
    pub units: f64,
    pub hospital: String,
    pub contact_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
    pub created_at: DateTime,
}

impl Record for BloodRequest {
    const COLLECTION: &'static str = "requests";

    fn from_payload(
        payload: &Map<String, Value>,
        created_at: DateTime,
    ) -> Result<Self, SchemaError> {
        Ok(Self {
            id: None,
            patient_name: schema::required_string(payload, "patientName")?,
            blood_group: schema::required_string(payload, "bloodGroup")?,
            units: schema::required_number(payload, "units")?,
            hospital: schema::required_string(payload, "hospital")?,
            contact_phone: schema::required_string(payload, "contactPhone")?,
            additional_info: schema::optional_string(payload, "additionalInfo")?,
            created_at,
        })
    }

    fn created_at(&self) -> DateTime {
        self.created_at
    }
}

/// Contact message model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime,
}

impl Record for ContactMessage {
    const COLLECTION: &'static str = "contacts";

    fn from_payload(
        payload: &Map<String, Value>,
        created_at: DateTime,
    ) -> Result<Self, SchemaError> {
        Ok(Self {
            id: None,
            name: schema::required_string(payload, "name")?,
            email: schema::required_string(payload, "email")?,
            message: schema::required_string(payload, "message")?,
            created_at,
        })
    }

    fn created_at(&self) -> DateTime {
        self.created_at
    }
}
