//! Supervisor (C9): boots components in order (Deployer -> Router ->
//! Poller/HTTP-inbound), owns the shared cancellation signal and drain
//! group, and blocks on the drain group before exiting once cancelled.

use crate::config::DeploymentConfig;
use crate::http_inbound;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::path::Path;
use std::sync::Arc;
use sy_common::DrainGroup;
use sy_mediation::MediationContext;
use sy_model::InboundProtocol;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

pub async fn run(deployment_root: &Path, cancellation: CancellationToken) -> anyhow::Result<()> {
    let config = DeploymentConfig::load(deployment_root)?;

    let graph = sy_deploy::deploy(&deployment_root.join("artifacts"));
    info!(
        apis = graph.api_count(),
        "deployment complete"
    );

    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("installing the process-wide Prometheus recorder should never fail twice");
    let (api_count, endpoint_count, sequence_count, inbound_count) = count_artifacts(&graph);
    sy_router::metrics::set_deployed_counts(api_count, endpoint_count, sequence_count, inbound_count);

    let graph = Arc::new(graph);
    let drain = DrainGroup::new();
    let mediation = MediationContext::new(graph.clone(), cancellation.clone(), drain.clone());

    let state = sy_router::AppState {
        graph: graph.clone(),
        mediation: mediation.clone(),
    };
    let router = sy_router::build_router(&state, metrics_handle);

    let router_cancellation = cancellation.clone();
    let router_handle = tokio::spawn(async move {
        if let Err(e) = sy_router::serve(router, &config.router.host, config.router.port, router_cancellation).await {
            error!(error = %e, "HTTP router exited with an error");
        }
    });

    let mut http_inbound_offset: u16 = 0;
    for inbound in graph.inbounds() {
        let mediation = mediation.clone();
        let cancellation = cancellation.clone();
        let drain = drain.clone();
        match &inbound.protocol {
            InboundProtocol::Http => {
                let port = config.inbound_http.port + http_inbound_offset * config.inbound_http.deployment_offset;
                http_inbound_offset += 1;
                let inbound_name = inbound.name.clone();
                let sequence_name = inbound.sequence_ref.clone();
                drain.add();
                tokio::spawn(async move {
                    let _done = DoneOnDrop(drain);
                    if let Err(e) = http_inbound::run(inbound_name.clone(), sequence_name, mediation, "0.0.0.0", port, cancellation).await {
                        error!(inbound = %inbound_name, error = %e, "HTTP inbound exited with an error");
                    }
                });
            }
            InboundProtocol::File(params) => {
                let inbound_name: Arc<str> = Arc::from(inbound.name.as_str());
                let sequence_name: Arc<str> = Arc::from(inbound.sequence_ref.as_str());
                let params = params.clone();
                tokio::spawn(sy_poller::run(inbound_name, sequence_name, params, mediation, drain, cancellation));
            }
        }
    }

    if graph.inbounds().next().is_none() {
        warn!("no inbounds deployed; only the HTTP router and its built-in routes are reachable");
    }

    cancellation.cancelled().await;
    info!("supervisor observed cancellation, waiting for in-flight work to drain");
    drain.wait().await;
    let _ = router_handle.await;
    info!("supervisor shutdown complete");
    Ok(())
}

fn count_artifacts(graph: &sy_model::ArtifactGraph) -> (usize, usize, usize, usize) {
    (
        graph.api_count(),
        graph.endpoints().count(),
        graph.sequences().count(),
        graph.inbounds().count(),
    )
}

struct DoneOnDrop(DrainGroup);

impl Drop for DoneOnDrop {
    fn drop(&mut self) {
        self.0.done();
    }
}
