//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `/v1/*` - REST API, see [`crate::api::routes`]
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Panic recovery** - A panicking handler yields `500` instead of a dropped connection
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Authentication** - Bearer token resolved on every API request
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::middleware::{rate_limit, rate_limit::RateLimit, tracing};
use crate::config::Config;
use crate::state::AppState;
use anyhow::Result;
use axum::Router;
use tower::Layer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// When `config.behind_proxy` is set, rate limiting keys on the forwarded
/// client address instead of the peer socket address. Enable it only when the
/// service runs behind a trusted reverse proxy.
///
/// # Errors
///
/// Returns an error if the rate limit settings are zero.
pub fn app_router(state: AppState, config: &Config) -> Result<NormalizePath<Router>> {
    let limit = RateLimit {
        per_second: config.rate_limit_per_second,
        burst: config.rate_limit_burst,
    };

    let api_router = api::routes::router(state.clone());
    let api_router = if config.behind_proxy {
        api_router.layer(rate_limit::proxied_layer(limit)?)
    } else {
        api_router.layer(rate_limit::layer(limit)?)
    };

    let router = Router::new()
        .nest("/v1", api_router)
        .with_state(state)
        .layer(CatchPanicLayer::new())
        .layer(tracing::layer());

    Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
}
