use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GateQuery {
    #[serde(default)]
    pub key: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GateResponse {
    pub granted: bool,
}

/// Check whether a scanned QR (society, key) pair may open the intake form.
///
/// Denials are undifferentiated on purpose: the response never says whether
/// the society was missing, inactive, the token wrong, or the code expired.
#[utoipa::path(
    get,
    path = "/api/v0/societies/{society_id}/gate",
    tag = "intake",
    params(
        ("society_id" = Uuid, Path, description = "Society identifier from the QR code"),
        ("key" = String, Query, description = "Access token from the QR code")
    ),
    responses(
        (status = 200, description = "Gate decision", body = GateResponse)
    )
)]
#[tracing::instrument(skip(state, query), fields(society_id = %society_id))]
pub async fn check_gate(
    State(state): State<Arc<AppState>>,
    Path(society_id): Path<Uuid>,
    Query(query): Query<GateQuery>,
) -> Result<Json<GateResponse>, HttpAppError> {
    let decision = state.gate.validate(society_id, &query.key).await;
    Ok(Json(GateResponse {
        granted: decision.is_granted(),
    }))
}
