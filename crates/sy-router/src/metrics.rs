//! Prometheus counters for the HTTP router, exposed at `/metrics`.
//! Grounded on the `metrics`-crate macro idiom the mediation engine
//! uses elsewhere, not the sliding-window collector — this engine
//! needs basic operational counters, not percentile tracking.

use metrics::{counter, gauge};

pub fn record_request_routed(api: &str, method: &str, status: u16) {
    counter!(
        "sy_requests_routed_total",
        "api" => api.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_request_rejected(api: &str, reason: &str) {
    counter!(
        "sy_requests_rejected_total",
        "api" => api.to_string(),
        "reason" => reason.to_string()
    )
    .increment(1);
}

pub fn set_deployed_counts(apis: usize, endpoints: usize, sequences: usize, inbounds: usize) {
    gauge!("sy_deployed_apis").set(apis as f64);
    gauge!("sy_deployed_endpoints").set(endpoints as f64);
    gauge!("sy_deployed_sequences").set(sequences as f64);
    gauge!("sy_deployed_inbounds").set(inbounds as f64);
}
