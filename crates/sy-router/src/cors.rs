//! Builds a `tower_http::cors::CorsLayer` from a parsed `CorsConfig`.
//! Origin matching (exact / `*` / `*.suffix`) is delegated to
//! `CorsConfig::origin_allowed` so the policy lives in one place.

use axum::http::{HeaderName, Method};
use std::str::FromStr;
use std::time::Duration;
use sy_model::CorsConfig;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub fn build_layer(config: &CorsConfig) -> CorsLayer {
    let predicate_config = config.clone();
    let mut layer = CorsLayer::new().allow_origin(AllowOrigin::predicate(move |origin, _parts| {
        origin
            .to_str()
            .map(|o| predicate_config.origin_allowed(o))
            .unwrap_or(false)
    }));

    let methods: Vec<Method> = config
        .allow_methods
        .iter()
        .filter_map(|m| Method::from_str(m).ok())
        .collect();
    if !methods.is_empty() {
        layer = layer.allow_methods(methods);
    }

    let headers: Vec<HeaderName> = config
        .allow_headers
        .iter()
        .filter_map(|h| HeaderName::from_str(h).ok())
        .collect();
    if !headers.is_empty() {
        layer = layer.allow_headers(headers);
    }

    let expose: Vec<HeaderName> = config
        .expose_headers
        .iter()
        .filter_map(|h| HeaderName::from_str(h).ok())
        .collect();
    if !expose.is_empty() {
        layer = layer.expose_headers(expose);
    }

    if config.allow_credentials {
        layer = layer.allow_credentials(true);
    }

    if let Some(max_age) = config.max_age {
        layer = layer.max_age(Duration::from_secs(max_age));
    }

    layer
}
