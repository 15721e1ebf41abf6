use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

/// Visit purpose vocabulary.
///
/// The string forms are a closed vocabulary shared with the downstream
/// approval and reporting screens and must be preserved verbatim,
/// including `Food Delivery` and `Cab / Driver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Purpose {
    Guest,
    Delivery,
    #[serde(rename = "Food Delivery")]
    FoodDelivery,
    #[serde(rename = "Cab / Driver")]
    CabDriver,
    Maid,
    Electrician,
    Plumber,
    Maintenance,
    Courier,
    Other,
}

impl Purpose {
    pub const ALL: [Purpose; 10] = [
        Purpose::Guest,
        Purpose::Delivery,
        Purpose::FoodDelivery,
        Purpose::CabDriver,
        Purpose::Maid,
        Purpose::Electrician,
        Purpose::Plumber,
        Purpose::Maintenance,
        Purpose::Courier,
        Purpose::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::Guest => "Guest",
            Purpose::Delivery => "Delivery",
            Purpose::FoodDelivery => "Food Delivery",
            Purpose::CabDriver => "Cab / Driver",
            Purpose::Maid => "Maid",
            Purpose::Electrician => "Electrician",
            Purpose::Plumber => "Plumber",
            Purpose::Maintenance => "Maintenance",
            Purpose::Courier => "Courier",
            Purpose::Other => "Other",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Purpose {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|p| p.as_str() == s.trim())
            .copied()
            .ok_or_else(|| AppError::Validation(format!("Unknown purpose '{}'", s)))
    }
}

/// Visitor request lifecycle status.
///
/// The intake pipeline only ever creates `pending`; all other transitions
/// belong to the resident/guard collaborators. `rejected` and `exited`
/// are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "request_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Hold,
    Exited,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Rejected | RequestStatus::Exited)
    }
}

/// Origin of a visitor request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "request_source", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum RequestSource {
    /// Self-service submission through the QR-gated public form.
    Qr,
    /// Manual entry at the guard desk (external collaborator).
    Desk,
}

/// A visitor's entry request, denormalized at submission time.
///
/// `unit_no` and `resident_uid` are snapshots copied from the unit at
/// creation so the audit record is stable against later unit edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitorRequest {
    pub id: Uuid,
    pub society_id: Uuid,
    pub name: String,
    pub phone: String,
    pub unit_no: String,
    pub purpose: Purpose,
    pub vehicle_number: Option<String>,
    pub photo_key: String,
    pub photo_url: String,
    pub resident_uid: Uuid,
    pub status: RequestStatus,
    pub source: RequestSource,
    pub created_at: DateTime<Utc>,
    pub entry_time: Option<DateTime<Utc>>,
    pub exit_time: Option<DateTime<Utc>>,
}

/// Fields for creating a visitor request. `status`, `source`, and
/// `created_at` are assigned by the repository, not the caller.
#[derive(Debug, Clone)]
pub struct NewVisitorRequest {
    pub society_id: Uuid,
    pub name: String,
    pub phone: String,
    pub unit_no: String,
    pub purpose: Purpose,
    pub vehicle_number: Option<String>,
    pub photo_key: String,
    pub photo_url: String,
    pub resident_uid: Uuid,
}

/// API response shape for a created visitor request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VisitorRequestResponse {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub unit_no: String,
    pub purpose: Purpose,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_number: Option<String>,
    pub photo_url: String,
    pub status: RequestStatus,
    pub source: RequestSource,
    pub created_at: DateTime<Utc>,
    /// Resident display name, when the best-effort lookup succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resident_name: Option<String>,
}

impl VisitorRequestResponse {
    pub fn from_request(request: VisitorRequest, resident_name: Option<String>) -> Self {
        Self {
            id: request.id,
            name: request.name,
            phone: request.phone,
            unit_no: request.unit_no,
            purpose: request.purpose,
            vehicle_number: request.vehicle_number,
            photo_url: request.photo_url,
            status: request.status,
            source: request.source,
            created_at: request.created_at,
            resident_name,
        }
    }
}
