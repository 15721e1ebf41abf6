use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Society operational status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "society_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum SocietyStatus {
    Active,
    Inactive,
}

/// Society (tenant) entity.
///
/// The QR gate reads `status`, `qr_key`, and `qr_expiry`. Token rotation is
/// an admin-console action; this service never writes societies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Society {
    pub id: Uuid,
    pub name: String,
    pub status: SocietyStatus,
    /// Rotating shared access token embedded in the society's QR code.
    /// Empty means QR entry is disabled.
    pub qr_key: String,
    pub qr_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
