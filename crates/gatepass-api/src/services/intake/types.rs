use bytes::Bytes;
use uuid::Uuid;

/// Request-scoped context for one intake attempt.
///
/// Passed explicitly into every stage; there is deliberately no ambient
/// "current society" state anywhere in the pipeline.
#[derive(Debug, Clone, Copy)]
pub struct IntakeContext {
    pub society_id: Uuid,
}

impl IntakeContext {
    pub fn new(society_id: Uuid) -> Self {
        Self { society_id }
    }
}

/// Raw form fields as submitted by the visitor. Trimming, normalization,
/// and vocabulary checks happen in the guard, not at extraction time.
#[derive(Debug, Clone, Default)]
pub struct VisitorSubmission {
    pub name: String,
    pub phone: String,
    pub unit_no: String,
    pub purpose: String,
    pub vehicle_number: String,
}

/// The photo artifact attached to a submission.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Photo acceptance policy, sourced from configuration.
#[derive(Debug, Clone)]
pub struct PhotoPolicy {
    pub max_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
}

impl PhotoPolicy {
    pub fn from_config(config: &gatepass_core::Config) -> Self {
        Self {
            max_size_bytes: config.photo_max_size_bytes(),
            allowed_extensions: config.photo_allowed_extensions().to_vec(),
            allowed_content_types: config.photo_allowed_content_types().to_vec(),
        }
    }
}
