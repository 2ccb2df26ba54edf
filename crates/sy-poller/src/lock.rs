//! Distributed `.lock` co-files: an optional second layer of
//! exclusion on top of the in-process `ClaimSet`, meant to coordinate
//! multiple poller processes sharing one directory.

use crate::protocol::{lock_path, FileEntry};
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, warn};

pub enum LockOutcome {
    Acquired,
    /// Another process holds a live lock; skip this file this cycle.
    HeldByOther,
}

/// Attempts to create `<file>.lock` exclusively. If it already exists
/// and `auto_lock_release_interval` is `Some` and exceeded by the lock
/// file's age, the stale lock is removed and a fresh one is created.
/// `None` disables staleness reclaim entirely (`-1` in config).
pub async fn acquire(entry: &FileEntry, auto_lock_release_interval: Option<Duration>) -> std::io::Result<LockOutcome> {
    let path = lock_path(entry);
    let body = format!("pid:{}\nhost:{}\ntime:{}\n", std::process::id(), hostname(), Utc::now().to_rfc3339());

    match try_create(&path, &body).await {
        Ok(()) => Ok(LockOutcome::Acquired),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            let Some(max_age) = auto_lock_release_interval else {
                debug!(lock = %path.display(), "stale-lock reclaim disabled, skipping file this cycle");
                return Ok(LockOutcome::HeldByOther);
            };
            let metadata = tokio::fs::metadata(&path).await?;
            let age = metadata.modified()?.elapsed().unwrap_or_default();
            if age > max_age {
                warn!(lock = %path.display(), age_secs = age.as_secs(), "reclaiming stale lock file");
                tokio::fs::remove_file(&path).await?;
                try_create(&path, &body).await?;
                Ok(LockOutcome::Acquired)
            } else {
                Ok(LockOutcome::HeldByOther)
            }
        }
        Err(e) => Err(e),
    }
}

pub async fn release(entry: &FileEntry) -> std::io::Result<()> {
    let path = lock_path(entry);
    match tokio::fs::remove_file(&path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

async fn try_create(path: &std::path::Path, body: &str) -> std::io::Result<()> {
    use tokio::io::AsyncWriteExt;
    let mut file = tokio::fs::OpenOptions::new().write(true).create_new(true).open(path).await?;
    file.write_all(body.as_bytes()).await
}

fn hostname() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown-host".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::FileEntry;
    use tempfile::tempdir;

    async fn entry(dir: &std::path::Path, name: &str) -> FileEntry {
        let path = dir.join(name);
        tokio::fs::write(&path, b"x").await.unwrap();
        FileEntry {
            uri: format!("file://{}", path.display()),
            path,
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn acquire_then_release_allows_reacquire() {
        let dir = tempdir().unwrap();
        let e = entry(dir.path(), "a.txt").await;

        assert!(matches!(acquire(&e, None).await.unwrap(), LockOutcome::Acquired));
        release(&e).await.unwrap();
        assert!(matches!(acquire(&e, None).await.unwrap(), LockOutcome::Acquired));
    }

    #[tokio::test]
    async fn second_acquire_without_release_is_held_by_other() {
        let dir = tempdir().unwrap();
        let e = entry(dir.path(), "b.txt").await;

        assert!(matches!(acquire(&e, None).await.unwrap(), LockOutcome::Acquired));
        assert!(matches!(acquire(&e, None).await.unwrap(), LockOutcome::HeldByOther));
    }

    #[tokio::test]
    async fn stale_lock_is_reclaimed_once_max_age_elapsed() {
        let dir = tempdir().unwrap();
        let e = entry(dir.path(), "c.txt").await;

        assert!(matches!(acquire(&e, None).await.unwrap(), LockOutcome::Acquired));
        // A max_age of zero means any existing lock is immediately stale.
        assert!(matches!(
            acquire(&e, Some(Duration::from_secs(0))).await.unwrap(),
            LockOutcome::Acquired
        ));
    }

    #[tokio::test]
    async fn release_of_missing_lock_is_not_an_error() {
        let dir = tempdir().unwrap();
        let e = entry(dir.path(), "d.txt").await;
        release(&e).await.unwrap();
    }
}
