use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gatepass_core::models::{
    NewVisitorRequest, Purpose, RequestSource, RequestStatus, VisitorRequest,
};
use gatepass_core::stores::VisitorRequestStore;
use gatepass_core::AppError;
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;

/// Raw visitor_requests row.
///
/// `purpose` stays TEXT in the database (the vocabulary contains spaces and
/// slashes); `to_visitor_request` is the validation boundary that rejects a
/// malformed row instead of propagating an unknown purpose downstream.
#[derive(Debug, Clone, FromRow)]
pub struct VisitorRequestRow {
    pub id: Uuid,
    pub society_id: Uuid,
    pub name: String,
    pub phone: String,
    pub unit_no: String,
    pub purpose: String,
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

impl VisitorRequestRow {
    pub fn to_visitor_request(&self) -> Result<VisitorRequest, AppError> {
        let purpose: Purpose = self.purpose.parse().map_err(|_| {
            AppError::Internal(format!(
                "visitor_requests row {} has unknown purpose '{}'",
                self.id, self.purpose
            ))
        })?;
        Ok(VisitorRequest {
            id: self.id,
            society_id: self.society_id,
            name: self.name.clone(),
            phone: self.phone.clone(),
            unit_no: self.unit_no.clone(),
            purpose,
            vehicle_number: self.vehicle_number.clone(),
            photo_key: self.photo_key.clone(),
            photo_url: self.photo_url.clone(),
            resident_uid: self.resident_uid,
            status: self.status,
            source: self.source,
            created_at: self.created_at,
            entry_time: self.entry_time,
            exit_time: self.exit_time,
        })
    }
}

const REQUEST_COLUMNS: &str = "id, society_id, name, phone, unit_no, purpose, vehicle_number, \
     photo_key, photo_url, resident_uid, status, source, created_at, entry_time, exit_time";

/// Visitor request persistence. Append-only from the intake pipeline's
/// perspective; status transitions belong to the approval collaborators.
#[derive(Clone)]
pub struct VisitorRequestRepository {
    pool: PgPool,
}

impl VisitorRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Existence check for a pending request with the same (phone, unit).
    /// Point-in-time: a concurrent submission can pass this check and still
    /// create a duplicate; the accepted race is documented in the pipeline.
    pub async fn has_pending(
        &self,
        society_id: Uuid,
        phone: &str,
        unit_no: &str,
    ) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<Postgres, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM visitor_requests
                WHERE society_id = $1 AND phone = $2 AND unit_no = $3 AND status = $4
            )
            "#,
        )
        .bind(society_id)
        .bind(phone)
        .bind(unit_no)
        .bind(RequestStatus::Pending)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Insert one request. Status, source, and created_at are assigned
    /// here (status `pending`, source `qr`, DB clock), never by the caller.
    pub async fn insert(&self, request: NewVisitorRequest) -> Result<VisitorRequest, AppError> {
        let row = sqlx::query_as::<Postgres, VisitorRequestRow>(&format!(
            r#"
            INSERT INTO visitor_requests
                (society_id, name, phone, unit_no, purpose, vehicle_number,
                 photo_key, photo_url, resident_uid, status, source)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            REQUEST_COLUMNS
        ))
        .bind(request.society_id)
        .bind(&request.name)
        .bind(&request.phone)
        .bind(&request.unit_no)
        .bind(request.purpose.as_str())
        .bind(&request.vehicle_number)
        .bind(&request.photo_key)
        .bind(&request.photo_url)
        .bind(request.resident_uid)
        .bind(RequestStatus::Pending)
        .bind(RequestSource::Qr)
        .fetch_one(&self.pool)
        .await?;

        row.to_visitor_request()
    }
}

#[async_trait]
impl VisitorRequestStore for VisitorRequestRepository {
    async fn pending_exists(
        &self,
        society_id: Uuid,
        phone: &str,
        unit_no: &str,
    ) -> Result<bool, AppError> {
        self.has_pending(society_id, phone, unit_no).await
    }

    async fn create(&self, request: NewVisitorRequest) -> Result<VisitorRequest, AppError> {
        self.insert(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(purpose: &str) -> VisitorRequestRow {
        VisitorRequestRow {
            id: Uuid::new_v4(),
            society_id: Uuid::new_v4(),
            name: "Asha".to_string(),
            phone: "9876543210".to_string(),
            unit_no: "A-101".to_string(),
            purpose: purpose.to_string(),
            vehicle_number: None,
            photo_key: "visitor_photos/s/1_face.jpg".to_string(),
            photo_url: "http://localhost/photos/visitor_photos/s/1_face.jpg".to_string(),
            resident_uid: Uuid::new_v4(),
            status: RequestStatus::Pending,
            source: RequestSource::Qr,
            created_at: Utc::now(),
            entry_time: None,
            exit_time: None,
        }
    }

    #[test]
    fn row_with_known_purpose_converts() {
        let request = row("Cab / Driver").to_visitor_request().unwrap();
        assert_eq!(request.purpose, Purpose::CabDriver);
        assert_eq!(request.status, RequestStatus::Pending);
    }

    #[test]
    fn row_with_unknown_purpose_is_rejected() {
        let err = row("Skydiving").to_visitor_request().unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
