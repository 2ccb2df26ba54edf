//! One processing cycle: lists matching files, claims each, and
//! dispatches it to mediation with an after-action disposition.

use crate::claimset::{ClaimGuard, ClaimSet};
use crate::lock::{self, LockOutcome};
use crate::protocol::FileProtocol;
use chrono::{DateTime, Utc};
use metrics::counter;
use regex::Regex;
use std::sync::Arc;
use sy_common::MessageContext;
use sy_mediation::MediationContext;
use sy_model::{ActionAfterProcess, FilePollerParams};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

pub async fn run_cycle(
    protocol: Arc<dyn FileProtocol>,
    params: Arc<FilePollerParams>,
    pattern: Arc<Regex>,
    claims: ClaimSet,
    mediation: MediationContext,
    sequence_name: Arc<str>,
    cancellation: CancellationToken,
) {
    let entries = match protocol.list_files(&params.file_uri, &pattern).await {
        Ok(entries) => entries,
        Err(e) => {
            error!(uri = %params.file_uri, error = %e, "failed to list files, skipping cycle");
            return;
        }
    };

    if params.sequential {
        for entry in entries {
            if cancellation.is_cancelled() {
                info!("cycle observed cancellation, stopping before next file");
                break;
            }
            process_one(protocol.clone(), params.clone(), claims.clone(), mediation.clone(), sequence_name.clone(), entry).await;
        }
        return;
    }

    let mut handles = Vec::new();
    for entry in entries {
        if cancellation.is_cancelled() {
            info!("cycle observed cancellation, not admitting further files");
            break;
        }
        let protocol = protocol.clone();
        let params = params.clone();
        let claims = claims.clone();
        let mediation = mediation.clone();
        let sequence_name = sequence_name.clone();
        handles.push(tokio::spawn(async move {
            process_one(protocol, params, claims, mediation, sequence_name, entry).await;
        }));
    }
    for handle in handles {
        let _ = handle.await;
    }
}

async fn process_one(
    protocol: Arc<dyn FileProtocol>,
    params: Arc<FilePollerParams>,
    claims: ClaimSet,
    mediation: MediationContext,
    sequence_name: Arc<str>,
    entry: crate::protocol::FileEntry,
) {
    if !claims.try_claim(&entry.uri) {
        return;
    }
    let _guard = ClaimGuard::new(claims, entry.uri.clone());

    match lock::acquire(&entry, params.auto_lock_release_interval).await {
        Ok(LockOutcome::HeldByOther) => {
            warn!(uri = %entry.uri, "file is locked by another process, skipping this cycle");
            return;
        }
        Err(e) => {
            error!(uri = %entry.uri, error = %e, "failed to acquire lock file, skipping");
            return;
        }
        Ok(LockOutcome::Acquired) => {}
    }

    let outcome = dispatch(protocol.as_ref(), &params, &mediation, &sequence_name, &entry).await;
    counter!(
        "sy_poller_cycles_total",
        "outcome" => if outcome { "success" } else { "failure" }
    )
    .increment(1);

    let action = if outcome { params.action_after_process } else { params.action_after_failure };
    let move_target = if outcome { &params.move_after_process } else { &params.move_after_failure };

    let disposition_result = match action {
        ActionAfterProcess::Delete => protocol.delete_file(&entry).await,
        ActionAfterProcess::Move => match move_target {
            Some(dest) => protocol.move_file(&entry, dest).await,
            None => {
                error!(uri = %entry.uri, "MOVE action configured with no destination, deleting instead");
                protocol.delete_file(&entry).await
            }
        },
    };
    if let Err(e) = disposition_result {
        error!(uri = %entry.uri, error = %e, "failed to apply after-action disposition");
    }

    if let Err(e) = lock::release(&entry).await {
        error!(uri = %entry.uri, error = %e, "failed to release lock file");
    }
}

async fn dispatch(
    protocol: &dyn FileProtocol,
    params: &FilePollerParams,
    mediation: &MediationContext,
    sequence_name: &str,
    entry: &crate::protocol::FileEntry,
) -> bool {
    let size = match protocol.size(entry).await {
        Ok(s) => s,
        Err(e) => {
            error!(uri = %entry.uri, error = %e, "failed to stat file");
            return false;
        }
    };
    let modified = match protocol.last_modified(entry).await {
        Ok(m) => m,
        Err(e) => {
            error!(uri = %entry.uri, error = %e, "failed to read modification time");
            return false;
        }
    };
    let payload = match protocol.read_file(entry).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(uri = %entry.uri, error = %e, "failed to read file contents");
            return false;
        }
    };

    let mut msg = MessageContext::new();
    msg.payload = payload;
    msg.content_type = params.content_type.clone();
    msg.headers.insert("FILE_LENGTH", size.to_string());
    let modified_dt: DateTime<Utc> = modified.into();
    msg.headers.insert("LAST_MODIFIED", modified_dt.timestamp().to_string());
    msg.headers.insert("FILE_URI", entry.uri.clone());
    msg.headers.insert("FILE_PATH", entry.path.display().to_string());
    msg.headers.insert("FILE_NAME", entry.name.clone());

    let sequence = match mediation.graph.sequence(sequence_name) {
        Some(s) => s.clone(),
        None => {
            error!(sequence = %sequence_name, "file inbound sequence not found, treating as failure");
            return false;
        }
    };

    sy_mediation::execute_resource(&sequence, None, &mut msg, mediation).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::LocalFileProtocol;
    use std::sync::Arc;
    use sy_common::{DrainGroup, Position};
    use sy_model::{ArtifactGraph, Mediator, MediatorKind, RespondMediator, Sequence};
    use tempfile::tempdir;
    use tokio_util::sync::CancellationToken;

    fn pos() -> Position {
        Position::new("test.xml".to_string(), 1, "TestSequence".to_string())
    }

    fn succeeding_sequence() -> Sequence {
        Sequence {
            name: Some("onFileReceive".to_string()),
            mediators: vec![Mediator {
                kind: MediatorKind::Respond(RespondMediator),
                position: pos(),
            }],
            position: pos(),
        }
    }

    fn mediation_with_sequence(sequence: Option<Sequence>) -> MediationContext {
        let mut graph = ArtifactGraph::new();
        if let Some(seq) = sequence {
            graph.insert_sequence(seq).unwrap();
        }
        MediationContext::new(Arc::new(graph), CancellationToken::new(), DrainGroup::new())
    }

    fn file_params(dir: &std::path::Path, action: ActionAfterProcess, failure: ActionAfterProcess, move_dest: Option<String>) -> FilePollerParams {
        FilePollerParams {
            interval: std::time::Duration::from_secs(1),
            file_uri: format!("file://{}", dir.display()),
            content_type: "text/plain".to_string(),
            file_name_pattern: ".*".to_string(),
            sequential: true,
            coordination: false,
            action_after_process: action,
            action_after_failure: failure,
            move_after_process: move_dest.clone(),
            move_after_failure: move_dest,
            auto_lock_release_interval: None,
        }
    }

    async fn entry_for(dir: &std::path::Path, name: &str) -> crate::protocol::FileEntry {
        let path = dir.join(name);
        tokio::fs::write(&path, b"payload").await.unwrap();
        crate::protocol::FileEntry {
            uri: format!("file://{}", path.display()),
            path,
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn delete_after_successful_process() {
        let dir = tempdir().unwrap();
        let entry = entry_for(dir.path(), "a.txt").await;
        let params = Arc::new(file_params(dir.path(), ActionAfterProcess::Delete, ActionAfterProcess::Delete, None));
        let mediation = mediation_with_sequence(Some(succeeding_sequence()));

        process_one(
            Arc::new(LocalFileProtocol),
            params,
            ClaimSet::new(),
            mediation,
            Arc::from("onFileReceive"),
            entry.clone(),
        )
        .await;

        assert!(!entry.path.exists(), "file should have been deleted after success");
    }

    #[tokio::test]
    async fn move_after_failure_to_configured_destination() {
        let dir = tempdir().unwrap();
        let failed_dir = dir.path().join("failed");
        let entry = entry_for(dir.path(), "b.txt").await;
        let params = Arc::new(file_params(
            dir.path(),
            ActionAfterProcess::Delete,
            ActionAfterProcess::Move,
            Some(format!("file://{}", failed_dir.display())),
        ));
        // No sequence registered under this name: dispatch fails and
        // process_one takes the after-failure disposition.
        let mediation = mediation_with_sequence(None);

        process_one(
            Arc::new(LocalFileProtocol),
            params,
            ClaimSet::new(),
            mediation,
            Arc::from("missingSequence"),
            entry.clone(),
        )
        .await;

        assert!(!entry.path.exists());
        assert!(failed_dir.join("b.txt").exists(), "file should have been moved to the failure destination");
    }

    #[tokio::test]
    async fn move_with_no_destination_falls_back_to_delete() {
        let dir = tempdir().unwrap();
        let entry = entry_for(dir.path(), "c.txt").await;
        let params = Arc::new(file_params(dir.path(), ActionAfterProcess::Delete, ActionAfterProcess::Move, None));
        let mediation = mediation_with_sequence(None);

        process_one(
            Arc::new(LocalFileProtocol),
            params,
            ClaimSet::new(),
            mediation,
            Arc::from("missingSequence"),
            entry.clone(),
        )
        .await;

        assert!(!entry.path.exists(), "MOVE with no destination should fall back to DELETE");
    }

    #[tokio::test]
    async fn run_cycle_skips_an_already_claimed_file() {
        let dir = tempdir().unwrap();
        let entry = entry_for(dir.path(), "d.txt").await;
        let params = Arc::new(file_params(dir.path(), ActionAfterProcess::Delete, ActionAfterProcess::Delete, None));
        let claims = ClaimSet::new();
        claims.try_claim(&entry.uri);
        let mediation = mediation_with_sequence(Some(succeeding_sequence()));

        process_one(
            Arc::new(LocalFileProtocol),
            params,
            claims,
            mediation,
            Arc::from("onFileReceive"),
            entry.clone(),
        )
        .await;

        assert!(entry.path.exists(), "a file already claimed elsewhere must not be touched");
    }
}
