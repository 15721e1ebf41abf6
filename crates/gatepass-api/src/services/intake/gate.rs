use std::sync::Arc;

use chrono::Utc;
use gatepass_core::models::SocietyStatus;
use gatepass_core::stores::SocietyStore;
use uuid::Uuid;

/// Outcome of a QR gate check. Denials carry no cause: token mismatch,
/// inactive society, missing expiry, and past expiry are indistinguishable
/// to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Granted,
    Denied,
}

impl GateDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, GateDecision::Granted)
    }
}

/// QR gate validator.
///
/// Read-only: decides whether a presented (society, key) pair may reach
/// the intake form. Fails closed on every missing or mismatching input and
/// on any store fault.
#[derive(Clone)]
pub struct QrGate {
    societies: Arc<dyn SocietyStore>,
}

impl QrGate {
    pub fn new(societies: Arc<dyn SocietyStore>) -> Self {
        Self { societies }
    }

    #[tracing::instrument(skip(self, presented_key), fields(society_id = %society_id))]
    pub async fn validate(&self, society_id: Uuid, presented_key: &str) -> GateDecision {
        let presented = presented_key.trim();
        if presented.is_empty() {
            return GateDecision::Denied;
        }

        let society = match self.societies.get(society_id).await {
            Ok(Some(society)) => society,
            Ok(None) => return GateDecision::Denied,
            Err(e) => {
                // Store faults degrade to denial; the visitor can re-scan.
                tracing::warn!(error = %e, "Society lookup failed during QR validation");
                return GateDecision::Denied;
            }
        };

        if society.status != SocietyStatus::Active {
            return GateDecision::Denied;
        }

        let stored = society.qr_key.trim();
        if stored.is_empty() || stored != presented {
            return GateDecision::Denied;
        }

        // Expiry must be present and strictly in the future.
        match society.qr_expiry {
            Some(expiry) if Utc::now() < expiry => GateDecision::Granted,
            _ => GateDecision::Denied,
        }
    }
}
