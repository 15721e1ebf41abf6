//! Store traits for the intake pipeline's external collaborators.
//!
//! These are the seams between the pipeline and the persistence layer:
//! `gatepass-db` provides the Postgres implementations, and the pipeline
//! tests substitute in-memory fakes. The pipeline never mutates societies
//! or units; visitor requests are append-only from its perspective.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewVisitorRequest, Society, Unit, VisitorRequest};

/// Read-only society lookup, consumed by the QR gate.
#[async_trait]
pub trait SocietyStore: Send + Sync {
    async fn get(&self, society_id: Uuid) -> Result<Option<Society>, AppError>;
}

/// Read-only unit lookup.
///
/// Both lookup strategies must converge on the same result for the same
/// stored data: `get_keyed` is the primary-key lookup used by direct unit
/// entry; `find_by_unit_no` is the equality-filtered query used when the
/// block is selected separately from the unit number.
#[async_trait]
pub trait UnitStore: Send + Sync {
    async fn get_keyed(&self, society_id: Uuid, unit_no: &str) -> Result<Option<Unit>, AppError>;

    async fn find_by_unit_no(
        &self,
        society_id: Uuid,
        unit_no: &str,
    ) -> Result<Option<Unit>, AppError>;
}

/// Best-effort resident display-name lookup. Failure here must never
/// block a submission.
#[async_trait]
pub trait ResidentStore: Send + Sync {
    async fn display_name(&self, resident_uid: Uuid) -> Result<Option<String>, AppError>;
}

/// Visitor request persistence: the duplicate-pending existence check and
/// the append-only create.
#[async_trait]
pub trait VisitorRequestStore: Send + Sync {
    /// Point-in-time check for an existing `pending` request with the same
    /// (phone, unit). Not a transactional constraint; a narrow race window
    /// between this check and `create` is accepted.
    async fn pending_exists(
        &self,
        society_id: Uuid,
        phone: &str,
        unit_no: &str,
    ) -> Result<bool, AppError>;

    /// Create one request in status `pending` with a server-assigned
    /// creation timestamp.
    async fn create(&self, request: NewVisitorRequest) -> Result<VisitorRequest, AppError>;
}
