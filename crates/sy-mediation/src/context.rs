//! `MediationContext` — the request-scoped bundle every mediator and the
//! inbound adapters carry: the read-only artifact graph, the process-wide
//! cancellation signal, the shared drain group, and the pooled outbound
//! HTTP client used by `CallMediator`.
//!
//! This stands in for the two context-value keys the design calls
//! `ConfigContext` and `WaitGroup` — passing both as fields of one
//! `Arc`-shared struct rather than as untyped context values.

use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use sy_common::DrainGroup;
use sy_model::ArtifactGraph;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct MediationContext {
    pub graph: Arc<ArtifactGraph>,
    pub cancellation: CancellationToken,
    pub drain: DrainGroup,
    pub http_client: Client,
}

impl MediationContext {
    pub fn new(graph: Arc<ArtifactGraph>, cancellation: CancellationToken, drain: DrainGroup) -> Self {
        let http_client = Client::builder()
            .pool_max_idle_per_host(1024)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .expect("static reqwest client configuration is always valid");

        Self {
            graph,
            cancellation,
            drain,
            http_client,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}
