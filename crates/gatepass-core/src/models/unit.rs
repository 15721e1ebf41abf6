use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Dwelling unit within a society.
///
/// `unit_no` is the uppercase block-and-number composite (e.g. `A-101`).
/// A unit with no `resident_uid` cannot receive visitor submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Unit {
    pub society_id: Uuid,
    pub unit_no: String,
    pub block: Option<String>,
    pub resident_uid: Option<Uuid>,
    pub occupancy: String,
    pub created_at: DateTime<Utc>,
}
