//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: the repository shared by every handler
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use pantry_infra::StoreSettings;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router against the configured store (used by `main.rs`).
pub async fn build_app(settings: &StoreSettings) -> anyhow::Result<Router> {
    let services = services::build_services(settings).await?;
    Ok(router(services))
}

/// Router over already-built services.
pub fn router(services: services::AppServices) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::log_requests))
                .layer(Extension(Arc::new(services))),
        )
}
