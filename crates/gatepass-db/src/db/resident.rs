use async_trait::async_trait;
use gatepass_core::stores::ResidentStore;
use gatepass_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Resident display-name lookups. Best-effort from the pipeline's point of
/// view; the caller decides whether a failure here matters.
#[derive(Clone)]
pub struct ResidentRepository {
    pool: PgPool,
}

impl ResidentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_display_name(&self, resident_uid: Uuid) -> Result<Option<String>, AppError> {
        let name = sqlx::query_scalar::<Postgres, String>(
            "SELECT name FROM residents WHERE id = $1",
        )
        .bind(resident_uid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(name)
    }
}

#[async_trait]
impl ResidentStore for ResidentRepository {
    async fn display_name(&self, resident_uid: Uuid) -> Result<Option<String>, AppError> {
        self.get_display_name(resident_uid).await
    }
}
