use async_trait::async_trait;
use gatepass_core::models::Society;
use gatepass_core::stores::SocietyStore;
use gatepass_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Read-only society lookups for the QR gate.
#[derive(Clone)]
pub struct SocietyRepository {
    pool: PgPool,
}

impl SocietyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, society_id: Uuid) -> Result<Option<Society>, AppError> {
        let society = sqlx::query_as::<Postgres, Society>(
            r#"
            SELECT id, name, status, qr_key, qr_expiry, created_at, updated_at
            FROM societies
            WHERE id = $1
            "#,
        )
        .bind(society_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(society)
    }
}

#[async_trait]
impl SocietyStore for SocietyRepository {
    async fn get(&self, society_id: Uuid) -> Result<Option<Society>, AppError> {
        self.get_by_id(society_id).await
    }
}
