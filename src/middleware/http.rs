//! HTTP-level middleware (cross-cutting concerns).
//!
//! Applies to every route, health included.
//!
//! Responsibility:
//! - Request-Id generation + propagation (X-Request-Id)
//! - Access logging / request tracing (TraceLayer)
//! - Body size limit and global timeout, both taken from `HttpConfig`

use axum::error_handling::HandleErrorLayer;
use axum::{Json, Router};
use axum::http::{StatusCode, header::HeaderName};
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::HttpConfig;
use crate::error::ErrorResponse;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn apply(router: Router, config: &HttpConfig) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    let layers = ServiceBuilder::new()
        // Make the service error `Infallible` by converting errors into responses.
        // Keep the `{"error": ...}` body shape of the handlers.
        .layer(HandleErrorLayer::new(|err: BoxError| async move {
            let (status, message) = if err.is::<tower::timeout::error::Elapsed>() {
                tracing::warn!("request timed out");
                (StatusCode::SERVICE_UNAVAILABLE, "Request timed out")
            } else {
                tracing::error!(error = %err, "unhandled middleware error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            };
            (
                status,
                Json(ErrorResponse {
                    error: message.to_string(),
                }),
            )
        }))
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header))
        .layer(RequestBodyLimitLayer::new(config.body_limit_bytes))
        // Outer bound only; each upstream call has its own shorter reqwest timeout.
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http());

    router.layer(layers)
}
