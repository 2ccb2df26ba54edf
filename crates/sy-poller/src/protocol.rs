//! `FileProtocol` port: the contract the poller consumes from a VFS
//! backend. This crate implements it only for `file://` URIs via
//! `tokio::fs`; other backend prefixes are out of scope.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, Clone)]
pub struct FileEntry {
    pub uri: String,
    pub path: PathBuf,
    pub name: String,
}

#[async_trait]
pub trait FileProtocol: Send + Sync {
    async fn list_files(&self, directory_uri: &str, pattern: &regex::Regex) -> std::io::Result<Vec<FileEntry>>;
    async fn read_file(&self, entry: &FileEntry) -> std::io::Result<Vec<u8>>;
    async fn size(&self, entry: &FileEntry) -> std::io::Result<u64>;
    async fn last_modified(&self, entry: &FileEntry) -> std::io::Result<SystemTime>;
    async fn move_file(&self, entry: &FileEntry, destination_dir: &str) -> std::io::Result<()>;
    async fn delete_file(&self, entry: &FileEntry) -> std::io::Result<()>;
}

/// Strips a `file://` prefix, if present, down to a plain filesystem
/// path. URIs without the prefix are treated as already-plain paths.
pub fn uri_to_path(uri: &str) -> PathBuf {
    PathBuf::from(uri.strip_prefix("file://").unwrap_or(uri))
}

pub struct LocalFileProtocol;

#[async_trait]
impl FileProtocol for LocalFileProtocol {
    async fn list_files(&self, directory_uri: &str, pattern: &regex::Regex) -> std::io::Result<Vec<FileEntry>> {
        let dir = uri_to_path(directory_uri);
        let mut entries = Vec::new();
        let mut read_dir = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = read_dir.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if name.ends_with(".lock") || !pattern.is_match(&name) {
                continue;
            }
            let path = entry.path();
            let uri = format!("file://{}", path.display());
            entries.push(FileEntry { uri, path, name });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn read_file(&self, entry: &FileEntry) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&entry.path).await
    }

    async fn size(&self, entry: &FileEntry) -> std::io::Result<u64> {
        Ok(tokio::fs::metadata(&entry.path).await?.len())
    }

    async fn last_modified(&self, entry: &FileEntry) -> std::io::Result<SystemTime> {
        tokio::fs::metadata(&entry.path).await?.modified()
    }

    async fn move_file(&self, entry: &FileEntry, destination_dir: &str) -> std::io::Result<()> {
        let dest_dir = uri_to_path(destination_dir);
        tokio::fs::create_dir_all(&dest_dir).await?;
        let dest_path: PathBuf = dest_dir.join(&entry.name);
        tokio::fs::rename(&entry.path, &dest_path).await
    }

    async fn delete_file(&self, entry: &FileEntry) -> std::io::Result<()> {
        tokio::fs::remove_file(&entry.path).await
    }
}

pub fn lock_path(entry: &FileEntry) -> PathBuf {
    let mut p = entry.path.clone();
    let name = format!("{}.lock", entry.path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default());
    p.set_file_name(name);
    p
}

pub fn exists(path: &Path) -> bool {
    path.exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use tempfile::tempdir;

    #[test]
    fn uri_to_path_strips_file_scheme() {
        assert_eq!(uri_to_path("file:///tmp/a"), PathBuf::from("/tmp/a"));
        assert_eq!(uri_to_path("/tmp/a"), PathBuf::from("/tmp/a"));
    }

    #[tokio::test]
    async fn list_files_matches_pattern_and_skips_lock_files() {
        let dir = tempdir().unwrap();
        tokio::fs::write(dir.path().join("a.csv"), b"1").await.unwrap();
        tokio::fs::write(dir.path().join("b.txt"), b"2").await.unwrap();
        tokio::fs::write(dir.path().join("a.csv.lock"), b"3").await.unwrap();

        let protocol = LocalFileProtocol;
        let pattern = Regex::new(r".*\.csv$").unwrap();
        let entries = protocol.list_files(&format!("file://{}", dir.path().display()), &pattern).await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "a.csv");
    }

    #[tokio::test]
    async fn move_file_creates_destination_and_removes_source() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("processed");
        let src_path = dir.path().join("a.csv");
        tokio::fs::write(&src_path, b"1").await.unwrap();
        let entry = FileEntry {
            uri: format!("file://{}", src_path.display()),
            path: src_path.clone(),
            name: "a.csv".to_string(),
        };

        let protocol = LocalFileProtocol;
        protocol.move_file(&entry, &format!("file://{}", dest.display())).await.unwrap();

        assert!(!src_path.exists());
        assert!(dest.join("a.csv").exists());
    }

    #[tokio::test]
    async fn delete_file_removes_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.csv");
        tokio::fs::write(&path, b"1").await.unwrap();
        let entry = FileEntry {
            uri: format!("file://{}", path.display()),
            path: path.clone(),
            name: "a.csv".to_string(),
        };

        LocalFileProtocol.delete_file(&entry).await.unwrap();
        assert!(!path.exists());
    }
}
