use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum BlobError {
    #[error("Invalid content id '{0}'")]
    InvalidId(String),

    #[error("Failed to write blob: {0}")]
    Io(#[from] std::io::Error),
}

/// Content-addressed storage for processed images.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` under `content_id` and returns the public URL.
    /// Putting the same id twice is harmless.
    async fn put(&self, content_id: &str, bytes: &[u8]) -> Result<String, BlobError>;
}

/// Writes `<id>.jpg` files into one directory that the router serves.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    dir: PathBuf,
    base_url: String,
}

impl LocalBlobStore {
    pub fn new(dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        LocalBlobStore {
            dir: dir.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, content_id: &str) -> String {
        format!("{}/{}.jpg", self.base_url, content_id)
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, content_id: &str, bytes: &[u8]) -> Result<String, BlobError> {
        // ids are hex digests; anything else could escape the directory
        if content_id.is_empty() || !content_id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(BlobError::InvalidId(content_id.to_string()));
        }

        let path = self.dir.join(format!("{}.jpg", content_id));

        if tokio::fs::try_exists(&path).await? {
            tracing::debug!("Blob {} already stored", content_id);
            return Ok(self.url_for(content_id));
        }

        tokio::fs::create_dir_all(&self.dir).await?;

        // readers never see a partial file; temp names are per writer
        let partial = self.dir.join(format!("{}.{}.part", content_id, Uuid::new_v4()));
        if let Err(err) = write_and_rename(&partial, &path, bytes).await {
            let _ = tokio::fs::remove_file(&partial).await;
            if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                tracing::debug!("Blob {} stored by a concurrent writer", content_id);
            } else {
                return Err(err.into());
            }
        } else {
            tracing::info!("Stored blob {} ({} bytes)", content_id, bytes.len());
        }

        Ok(self.url_for(content_id))
    }
}

async fn write_and_rename(partial: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    tokio::fs::write(partial, bytes).await?;
    tokio::fs::rename(partial, path).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("propertydeals-{}-{}", name, uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn put_writes_file_and_returns_url() {
        let dir = temp_dir("blobs");
        let store = LocalBlobStore::new(&dir, "/media/");

        let url = store.put("abc123", b"jpeg bytes").await.unwrap();

        assert_eq!(url, "/media/abc123.jpg");
        assert_eq!(tokio::fs::read(dir.join("abc123.jpg")).await.unwrap(), b"jpeg bytes");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn put_is_idempotent() {
        let dir = temp_dir("idempotent");
        let store = LocalBlobStore::new(&dir, "https://cdn.example/media");

        let first = store.put("ff00", b"one").await.unwrap();
        let second = store.put("ff00", b"one").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first, "https://cdn.example/media/ff00.jpg");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn concurrent_puts_of_one_id_all_succeed() {
        let dir = temp_dir("concurrent");
        let store = std::sync::Arc::new(LocalBlobStore::new(&dir, "/media"));

        for _ in 0..50 {
            let _ = tokio::fs::remove_file(dir.join("abcdef.jpg")).await;

            let writers: Vec<_> = (0..4)
                .map(|_| {
                    let store = store.clone();
                    tokio::spawn(async move { store.put("abcdef", b"same bytes").await })
                })
                .collect();

            for writer in writers {
                assert_eq!(writer.await.unwrap().unwrap(), "/media/abcdef.jpg");
            }
        }

        let mut leftovers = Vec::new();
        let mut entries = tokio::fs::read_dir(&dir).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            leftovers.push(entry.file_name().to_string_lossy().to_string());
        }
        assert_eq!(leftovers, vec!["abcdef.jpg".to_string()]);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn non_hex_ids_are_rejected() {
        let store = LocalBlobStore::new(temp_dir("reject"), "/media");

        assert!(matches!(store.put("../etc/passwd", b"x").await, Err(BlobError::InvalidId(_))));
        assert!(matches!(store.put("", b"x").await, Err(BlobError::InvalidId(_))));
    }
}
