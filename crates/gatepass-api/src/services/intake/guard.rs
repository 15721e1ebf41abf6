use std::sync::Arc;

use chrono::Utc;
use gatepass_core::models::{NewVisitorRequest, Purpose, VisitorRequest};
use gatepass_core::stores::VisitorRequestStore;
use gatepass_core::{validation, AppError};
use gatepass_storage::{keys, Storage};

use super::resolver::UnitResolver;
use super::types::{IntakeContext, PhotoPolicy, PhotoUpload, VisitorSubmission};

/// Result of a successful submission: the created record plus the resident
/// name the resolver enriched it with, for the confirmation view.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub request: VisitorRequest,
    pub resident_name: Option<String>,
}

/// Submission guard.
///
/// Runs the full precondition chain in order, short-circuiting on the
/// first failure: required fields, phone shape, photo, unit resolution,
/// duplicate-pending. Only then does it touch storage and the database.
///
/// The duplicate check is point-in-time, not a transactional constraint: a
/// second submission racing the first can slip through the window between
/// the check and the write. Accepted; the uniqueness guarantee is only
/// that a later attempt observing an existing pending request refuses to
/// create another.
#[derive(Clone)]
pub struct SubmissionGuard {
    resolver: UnitResolver,
    requests: Arc<dyn VisitorRequestStore>,
    storage: Arc<dyn Storage>,
    photo_policy: PhotoPolicy,
}

impl SubmissionGuard {
    pub fn new(
        resolver: UnitResolver,
        requests: Arc<dyn VisitorRequestStore>,
        storage: Arc<dyn Storage>,
        photo_policy: PhotoPolicy,
    ) -> Self {
        Self {
            resolver,
            requests,
            storage,
            photo_policy,
        }
    }

    #[tracing::instrument(skip(self, submission, photo), fields(society_id = %ctx.society_id))]
    pub async fn submit(
        &self,
        ctx: &IntakeContext,
        submission: &VisitorSubmission,
        photo: Option<PhotoUpload>,
    ) -> Result<SubmissionOutcome, AppError> {
        // 1. Required fields, then phone shape. All checks run before any
        //    remote call.
        let name = validation::validate_name(&submission.name)?.to_string();
        let phone = validation::validate_phone(&submission.phone)?.to_string();
        let raw_unit_no = validation::require_trimmed(&submission.unit_no, "Unit number")?;
        let purpose: Purpose = validation::require_trimmed(&submission.purpose, "Purpose")?
            .parse()?;
        let vehicle_number = validation::normalize_vehicle_number(&submission.vehicle_number)?;

        // 2. Photo attached and within policy.
        let photo = photo.ok_or_else(|| AppError::Validation("Photo is required".to_string()))?;
        validation::validate_photo(
            &photo.filename,
            &photo.content_type,
            photo.data.len(),
            self.photo_policy.max_size_bytes,
            &self.photo_policy.allowed_extensions,
            &self.photo_policy.allowed_content_types,
        )?;

        // 3. Unit must resolve to a resident.
        let resolved = self.resolver.resolve(ctx, raw_unit_no).await?;

        // 4. Duplicate-pending check (point-in-time, see type docs).
        if self
            .requests
            .pending_exists(ctx.society_id, &phone, &resolved.unit_no)
            .await?
        {
            return Err(AppError::DuplicatePending {
                phone,
                unit_no: resolved.unit_no,
            });
        }

        // 5. Upload the photo, then create the record.
        let photo_key = keys::photo_key(
            ctx.society_id,
            &photo.filename,
            Utc::now().timestamp_millis(),
        );
        let photo_url = self
            .storage
            .upload(&photo_key, &photo.content_type, photo.data.to_vec())
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        let new_request = NewVisitorRequest {
            society_id: ctx.society_id,
            name,
            phone,
            unit_no: resolved.unit_no.clone(),
            purpose,
            vehicle_number,
            photo_key: photo_key.clone(),
            photo_url,
            resident_uid: resolved.resident_uid,
        };

        let request = match self.requests.create(new_request).await {
            Ok(request) => request,
            Err(write_err) => {
                // The photo is already durable; remove it so a failed write
                // leaves no orphaned object behind.
                return Err(self.cleanup_orphan(&photo_key, write_err).await);
            }
        };

        tracing::info!(
            request_id = %request.id,
            unit_no = %request.unit_no,
            "Visitor request created"
        );

        Ok(SubmissionOutcome {
            request,
            resident_name: resolved.resident_name,
        })
    }

    /// Delete the uploaded photo after a failed record write. If the delete
    /// also fails, surface the orphaned key so an external maintenance job
    /// can reap it; never report silent success.
    async fn cleanup_orphan(&self, photo_key: &str, write_err: AppError) -> AppError {
        match self.storage.delete(photo_key).await {
            Ok(()) => {
                tracing::warn!(photo_key = %photo_key,
                    "Record write failed; uploaded photo removed");
                write_err
            }
            Err(delete_err) => {
                tracing::error!(photo_key = %photo_key, error = %delete_err,
                    "Record write failed and photo cleanup failed; photo orphaned");
                AppError::OrphanedUpload {
                    photo_key: photo_key.to_string(),
                    message: write_err.to_string(),
                }
            }
        }
    }
}
