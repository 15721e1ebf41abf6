use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use gatepass_core::models::VisitorRequestResponse;
use gatepass_core::AppError;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::intake::{IntakeContext, PhotoUpload, VisitorSubmission};
use crate::state::AppState;

use super::gate::GateQuery;

/// Submit a visitor entry request through the QR-gated public form.
///
/// Multipart form: `name`, `phone`, `unit_no`, `purpose`, optional
/// `vehicle_number`, and a `photo` file. The gate is re-validated on every
/// submission; QR state can change between rendering the form and
/// submitting it.
#[utoipa::path(
    post,
    path = "/api/v0/societies/{society_id}/visitor-requests",
    tag = "intake",
    params(
        ("society_id" = Uuid, Path, description = "Society identifier from the QR code"),
        ("key" = String, Query, description = "Access token from the QR code")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Visitor request created", body = VisitorRequestResponse),
        (status = 400, description = "Missing or malformed field", body = ErrorResponse),
        (status = 403, description = "Invalid or expired QR code", body = ErrorResponse),
        (status = 404, description = "Unit not found", body = ErrorResponse),
        (status = 409, description = "A request is already pending", body = ErrorResponse),
        (status = 422, description = "No resident assigned to the unit", body = ErrorResponse),
        (status = 502, description = "Photo storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query, multipart), fields(society_id = %society_id))]
pub async fn submit_visitor_request(
    State(state): State<Arc<AppState>>,
    Path(society_id): Path<Uuid>,
    Query(query): Query<GateQuery>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<VisitorRequestResponse>), HttpAppError> {
    // Gate first; nothing is parsed or persisted for a denied key.
    let decision = state.gate.validate(society_id, &query.key).await;
    if !decision.is_granted() {
        return Err(AppError::AccessDenied.into());
    }

    let (submission, photo) = extract_submission(multipart).await?;

    let ctx = IntakeContext::new(society_id);
    let outcome = state.guard.submit(&ctx, &submission, photo).await?;

    Ok((
        StatusCode::CREATED,
        Json(VisitorRequestResponse::from_request(
            outcome.request,
            outcome.resident_name,
        )),
    ))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BlocksResponse {
    pub blocks: Vec<String>,
}

/// List the distinct blocks of a society, for a block/number selection UI.
/// Gate-protected like the rest of the intake surface.
#[utoipa::path(
    get,
    path = "/api/v0/societies/{society_id}/blocks",
    tag = "intake",
    params(
        ("society_id" = Uuid, Path, description = "Society identifier from the QR code"),
        ("key" = String, Query, description = "Access token from the QR code")
    ),
    responses(
        (status = 200, description = "Blocks in the society", body = BlocksResponse),
        (status = 403, description = "Invalid or expired QR code", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query), fields(society_id = %society_id))]
pub async fn list_blocks(
    State(state): State<Arc<AppState>>,
    Path(society_id): Path<Uuid>,
    Query(query): Query<GateQuery>,
) -> Result<Json<BlocksResponse>, HttpAppError> {
    let decision = state.gate.validate(society_id, &query.key).await;
    if !decision.is_granted() {
        return Err(AppError::AccessDenied.into());
    }

    let blocks = state.units.list_blocks(society_id).await?;
    Ok(Json(BlocksResponse { blocks }))
}

/// Pull the form fields and the photo out of the multipart body. Unknown
/// parts are ignored; validation of the values happens in the guard.
async fn extract_submission(
    mut multipart: Multipart,
) -> Result<(VisitorSubmission, Option<PhotoUpload>), AppError> {
    let mut submission = VisitorSubmission::default();
    let mut photo = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {}", e)))?
    {
        let Some(field_name) = field.name().map(str::to_string) else {
            continue;
        };
        match field_name.as_str() {
            "photo" => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| "photo.jpg".to_string());
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let data = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read photo field: {}", e))
                })?;
                photo = Some(PhotoUpload {
                    filename,
                    content_type,
                    data,
                });
            }
            name => {
                let value = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read field '{}': {}", name, e))
                })?;
                match name {
                    "name" => submission.name = value,
                    "phone" => submission.phone = value,
                    "unit_no" => submission.unit_no = value,
                    "purpose" => submission.purpose = value,
                    "vehicle_number" => submission.vehicle_number = value,
                    _ => {}
                }
            }
        }
    }

    Ok((submission, photo))
}
