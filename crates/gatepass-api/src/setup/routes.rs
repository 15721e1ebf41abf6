//! Route configuration and setup

use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use gatepass_core::Config;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa_rapidoc::RapiDoc;

use crate::api_doc;
use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    // Multipart body limit: the photo plus form-field overhead.
    let body_limit = RequestBodyLimitLayer::new(config.photo_max_size_bytes() + 64 * 1024);

    let api_routes = Router::new()
        .route(
            "/societies/{society_id}/gate",
            get(handlers::gate::check_gate),
        )
        .route(
            "/societies/{society_id}/blocks",
            get(handlers::visitor_request::list_blocks),
        )
        .route(
            "/societies/{society_id}/visitor-requests",
            post(handlers::visitor_request::submit_visitor_request),
        )
        .with_state(state);

    let router = Router::new()
        .route("/health", get(handlers::health::health))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", api_doc::openapi()).path("/docs"))
        .nest(API_PREFIX, api_routes)
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new().allow_origin(origins)
    };

    Ok(cors
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any))
}
