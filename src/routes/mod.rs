//! Host router for the standalone binary.
//!
//! The health responder sits in front of the router as middleware, so it
//! sees every request first and only the ones it does not own reach these
//! routes.

pub mod home;

use axum::{middleware, routing::get, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_BANNER;
use crate::health::{health_layer, HealthResponder};
use crate::middleware::request_id_layer;

/// Creates the Axum router with the health responder in front.
pub fn create_router(responder: HealthResponder) -> Router {
    Router::new()
        .route("/", get(home::index))
        .fallback(home::not_found)
        // Health check - answers its own path, passes the rest through
        .layer(middleware::from_fn_with_state(responder, health_layer))
        // Health responses already carry no-store, so only the banner picks this up
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_BANNER),
        ))
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
