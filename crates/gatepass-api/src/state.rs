//! Application state shared across handlers.

use std::sync::Arc;

use gatepass_core::Config;
use gatepass_db::{ResidentRepository, SocietyRepository, UnitRepository, VisitorRequestRepository};
use gatepass_storage::Storage;
use sqlx::PgPool;

use crate::services::intake::{PhotoPolicy, QrGate, SubmissionGuard, UnitResolver};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pool: PgPool,
    pub storage: Arc<dyn Storage>,
    pub units: UnitRepository,
    pub gate: QrGate,
    pub guard: SubmissionGuard,
}

impl AppState {
    /// Wire the pipeline from its collaborators. Repositories are cheap
    /// clones over the shared pool.
    pub fn new(config: Config, pool: PgPool, storage: Arc<dyn Storage>) -> Self {
        let societies = SocietyRepository::new(pool.clone());
        let units = UnitRepository::new(pool.clone());
        let residents = ResidentRepository::new(pool.clone());
        let requests = VisitorRequestRepository::new(pool.clone());

        let gate = QrGate::new(Arc::new(societies));
        let resolver = UnitResolver::new(
            Arc::new(units.clone()),
            Arc::new(residents),
            config.unit_lookup_strategy(),
        );
        let guard = SubmissionGuard::new(
            resolver,
            Arc::new(requests),
            storage.clone(),
            PhotoPolicy::from_config(&config),
        );

        Self {
            config,
            pool,
            storage,
            units,
            gate,
            guard,
        }
    }
}
