use async_trait::async_trait;
use gatepass_core::models::Unit;
use gatepass_core::stores::UnitStore;
use gatepass_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Read-only unit lookups.
///
/// Supports both resolver strategies: the keyed lookup goes straight at
/// the (society_id, unit_no) primary key; the filtered lookup compares the
/// unit_no column case-insensitively, tolerating legacy rows that were
/// imported in mixed case. For well-formed data the two return the same
/// row.
#[derive(Clone)]
pub struct UnitRepository {
    pool: PgPool,
}

impl UnitRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Primary-key lookup. `unit_no` must already be normalized (uppercase).
    pub async fn get_by_key(
        &self,
        society_id: Uuid,
        unit_no: &str,
    ) -> Result<Option<Unit>, AppError> {
        let unit = sqlx::query_as::<Postgres, Unit>(
            r#"
            SELECT society_id, unit_no, block, resident_uid, occupancy, created_at
            FROM units
            WHERE society_id = $1 AND unit_no = $2
            "#,
        )
        .bind(society_id)
        .bind(unit_no)
        .fetch_optional(&self.pool)
        .await?;

        Ok(unit)
    }

    /// Equality-filtered lookup on the unit_no column.
    pub async fn find_by_number(
        &self,
        society_id: Uuid,
        unit_no: &str,
    ) -> Result<Option<Unit>, AppError> {
        let unit = sqlx::query_as::<Postgres, Unit>(
            r#"
            SELECT society_id, unit_no, block, resident_uid, occupancy, created_at
            FROM units
            WHERE society_id = $1 AND UPPER(unit_no) = UPPER($2)
            "#,
        )
        .bind(society_id)
        .bind(unit_no)
        .fetch_optional(&self.pool)
        .await?;

        Ok(unit)
    }

    /// Distinct blocks within a society, for a block/number selection UI.
    pub async fn list_blocks(&self, society_id: Uuid) -> Result<Vec<String>, AppError> {
        let blocks = sqlx::query_scalar::<Postgres, String>(
            r#"
            SELECT DISTINCT block FROM units
            WHERE society_id = $1 AND block IS NOT NULL
            ORDER BY block
            "#,
        )
        .bind(society_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(blocks)
    }
}

#[async_trait]
impl UnitStore for UnitRepository {
    async fn get_keyed(&self, society_id: Uuid, unit_no: &str) -> Result<Option<Unit>, AppError> {
        self.get_by_key(society_id, unit_no).await
    }

    async fn find_by_unit_no(
        &self,
        society_id: Uuid,
        unit_no: &str,
    ) -> Result<Option<Unit>, AppError> {
        self.find_by_number(society_id, unit_no).await
    }
}
