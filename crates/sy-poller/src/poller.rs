//! Interval-driven supervisor for one File inbound: ticks on the
//! configured interval, spawning a processing cycle per tick. Cycles may
//! overlap a slow previous cycle; each is registered with the shared
//! drain group so shutdown can wait for in-flight ones to finish.

use crate::claimset::ClaimSet;
use crate::cycle::run_cycle;
use crate::protocol::{FileProtocol, LocalFileProtocol};
use regex::Regex;
use std::sync::Arc;
use sy_common::DrainGroup;
use sy_mediation::MediationContext;
use sy_model::FilePollerParams;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub struct DoneOnDrop(DrainGroup);

impl Drop for DoneOnDrop {
    fn drop(&mut self) {
        self.0.done();
    }
}

/// Runs until `cancellation` fires. Each tick spawns a cycle under
/// `drain` and returns immediately; it does not wait for the cycle to
/// finish before the next tick can fire.
pub async fn run(
    inbound_name: Arc<str>,
    sequence_name: Arc<str>,
    params: FilePollerParams,
    mediation: MediationContext,
    drain: DrainGroup,
    cancellation: CancellationToken,
) {
    let pattern = match Regex::new(&params.file_name_pattern) {
        Ok(p) => Arc::new(p),
        Err(e) => {
            error!(inbound = %inbound_name, error = %e, "invalid file name pattern, poller will not start");
            return;
        }
    };
    let protocol: Arc<dyn FileProtocol> = Arc::new(LocalFileProtocol);
    let params = Arc::new(params);
    let claims = ClaimSet::new();

    let mut ticker = tokio::time::interval(params.interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    info!(inbound = %inbound_name, uri = %params.file_uri, "file poller started");

    loop {
        tokio::select! {
            _ = cancellation.cancelled() => {
                info!(inbound = %inbound_name, "file poller stopping, no longer admitting new cycles");
                break;
            }
            _ = ticker.tick() => {
                drain.add();
                let guard = DoneOnDrop(drain.clone());
                let protocol = protocol.clone();
                let params = params.clone();
                let pattern = pattern.clone();
                let claims = claims.clone();
                let mediation = mediation.clone();
                let sequence_name = sequence_name.clone();
                let cancellation = cancellation.clone();
                tokio::spawn(async move {
                    let _guard = guard;
                    run_cycle(protocol, params, pattern, claims, mediation, sequence_name, cancellation).await;
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sy_model::ArtifactGraph;
    use tempfile::tempdir;
    use tokio_test::{assert_pending, assert_ready, task};

    fn params(dir: &std::path::Path) -> FilePollerParams {
        FilePollerParams {
            interval: std::time::Duration::from_secs(60),
            file_uri: format!("file://{}", dir.display()),
            content_type: "text/plain".to_string(),
            file_name_pattern: ".*".to_string(),
            sequential: true,
            coordination: false,
            action_after_process: sy_model::ActionAfterProcess::Delete,
            action_after_failure: sy_model::ActionAfterProcess::Delete,
            move_after_process: None,
            move_after_failure: None,
            auto_lock_release_interval: None,
        }
    }

    #[tokio::test]
    async fn stays_pending_until_cancelled_then_completes() {
        let dir = tempdir().unwrap();
        let mediation = MediationContext::new(Arc::new(ArtifactGraph::new()), CancellationToken::new(), DrainGroup::new());
        let cancellation = CancellationToken::new();
        let drain = DrainGroup::new();

        let mut fut = task::spawn(run(
            Arc::from("test-inbound"),
            Arc::from("onFileReceive"),
            params(dir.path()),
            mediation,
            drain,
            cancellation.clone(),
        ));

        // The first tick fires immediately and spawns one (no-op, empty
        // directory) cycle; the loop then waits on the next tick or
        // cancellation, neither due yet.
        assert_pending!(fut.poll());
        cancellation.cancel();
        assert_ready!(fut.poll());
    }

    #[tokio::test]
    async fn invalid_pattern_returns_immediately() {
        let dir = tempdir().unwrap();
        let mut bad_params = params(dir.path());
        bad_params.file_name_pattern = "(".to_string();
        let mediation = MediationContext::new(Arc::new(ArtifactGraph::new()), CancellationToken::new(), DrainGroup::new());

        let mut fut = task::spawn(run(
            Arc::from("test-inbound"),
            Arc::from("onFileReceive"),
            bad_params,
            mediation,
            DrainGroup::new(),
            CancellationToken::new(),
        ));

        assert_ready!(fut.poll());
    }
}
