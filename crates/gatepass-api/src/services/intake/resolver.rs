use std::sync::Arc;

use gatepass_core::config::UnitLookupStrategy;
use gatepass_core::models::Unit;
use gatepass_core::stores::{ResidentStore, UnitStore};
use gatepass_core::{validation, AppError};
use uuid::Uuid;

use super::types::IntakeContext;

/// A unit resolved to its bound resident.
#[derive(Debug, Clone)]
pub struct ResolvedUnit {
    /// Normalized (uppercase) unit identifier.
    pub unit_no: String,
    pub resident_uid: Uuid,
    /// Resident display name from the best-effort enrichment lookup.
    pub resident_name: Option<String>,
}

/// Unit resolver.
///
/// Normalizes a human-entered unit identifier and maps it to the bound
/// resident. The lookup strategy is fixed at construction: `Keyed` for
/// direct unit entry, `Filtered` for the block/number selection UX. Both
/// strategies return the same result for the same stored data.
#[derive(Clone)]
pub struct UnitResolver {
    units: Arc<dyn UnitStore>,
    residents: Arc<dyn ResidentStore>,
    strategy: UnitLookupStrategy,
}

impl UnitResolver {
    pub fn new(
        units: Arc<dyn UnitStore>,
        residents: Arc<dyn ResidentStore>,
        strategy: UnitLookupStrategy,
    ) -> Self {
        Self {
            units,
            residents,
            strategy,
        }
    }

    #[tracing::instrument(skip(self), fields(society_id = %ctx.society_id))]
    pub async fn resolve(
        &self,
        ctx: &IntakeContext,
        raw_unit_no: &str,
    ) -> Result<ResolvedUnit, AppError> {
        let unit_no = validation::normalize_unit_no(raw_unit_no)?;

        let unit = self.lookup(ctx.society_id, &unit_no).await?;
        let unit = unit.ok_or_else(|| AppError::UnitNotFound(unit_no.clone()))?;

        let resident_uid = unit
            .resident_uid
            .ok_or_else(|| AppError::NoResidentAssigned(unit_no.clone()))?;

        // Best-effort: a failed name lookup must never block the submission.
        let resident_name = match self.residents.display_name(resident_uid).await {
            Ok(name) => name,
            Err(e) => {
                tracing::debug!(error = %e, resident_uid = %resident_uid,
                    "Resident name lookup failed; continuing without it");
                None
            }
        };

        Ok(ResolvedUnit {
            unit_no,
            resident_uid,
            resident_name,
        })
    }

    async fn lookup(&self, society_id: Uuid, unit_no: &str) -> Result<Option<Unit>, AppError> {
        match self.strategy {
            UnitLookupStrategy::Keyed => self.units.get_keyed(society_id, unit_no).await,
            UnitLookupStrategy::Filtered => self.units.find_by_unit_no(society_id, unit_no).await,
        }
    }
}
