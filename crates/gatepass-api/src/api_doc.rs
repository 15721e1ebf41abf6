//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gatepass API",
        version = "0.1.0",
        description = "QR-gated visitor intake API for residential societies. \
            A society's rotating QR token opens a public intake form; accepted \
            submissions create pending visitor requests for resident approval. \
            All endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::gate::check_gate,
        handlers::visitor_request::submit_visitor_request,
        handlers::visitor_request::list_blocks,
        handlers::health::health,
    ),
    components(schemas(
        handlers::gate::GateResponse,
        handlers::visitor_request::BlocksResponse,
        handlers::health::HealthResponse,
        gatepass_core::models::VisitorRequestResponse,
        gatepass_core::models::Purpose,
        gatepass_core::models::RequestStatus,
        gatepass_core::models::RequestSource,
        crate::error::ErrorResponse,
    )),
    tags(
        (name = "intake", description = "QR-gated visitor intake"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
