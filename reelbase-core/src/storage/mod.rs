//! Blob storage for catalog file fields.
//!
//! Stored names are derived from upload content *before* any byte is
//! written: the database row must reference the final blob name inside the
//! same transaction that creates it, so derivation has to be pure. The
//! store itself has no transactional rollback, which is why failure paths
//! compensate through [`WriteLedger`].

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::Result;

pub mod fs;

pub use fs::FsBlobStore;

/// A pending upload: the original client filename plus the raw bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Upload {
    original_name: String,
    bytes: Vec<u8>,
}

impl Upload {
    pub fn new(original_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            original_name: original_name.into(),
            bytes,
        }
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Derive the collision-resistant stored name for this upload.
    pub fn stored_name(&self) -> StoredName {
        StoredName::derive(&self.bytes, &self.original_name)
    }
}

impl fmt::Debug for Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload")
            .field("original_name", &self.original_name)
            .field("byte_len", &self.bytes.len())
            .finish()
    }
}

/// A content-derived blob name: sha256 of the bytes plus the original
/// extension (lowercased), e.g. `3a7b...e1.jpg`.
///
/// Pure and computable before the blob is written; URL generation and the
/// row insert both depend on that ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoredName(String);

impl StoredName {
    pub fn derive(bytes: &[u8], original_name: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let digest = format!("{:x}", hasher.finalize());

        match extension_of(original_name) {
            Some(ext) => StoredName(format!("{digest}.{ext}")),
            None => StoredName(digest),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for StoredName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn extension_of(name: &str) -> Option<String> {
    let ext = std::path::Path::new(name).extension()?.to_str()?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Port over the blob store used by catalog writes.
///
/// `delete` on an absent path is a no-op, not an error: compensating-delete
/// paths may race with or duplicate other deletes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<()>;

    async fn delete(&self, path: &str) -> Result<()>;

    async fn contains(&self, path: &str) -> Result<bool>;
}

/// Compensation log for blobs written during one write attempt.
///
/// The blob store has no native rollback, so every path written during a
/// create is recorded here and deleted on any failure branch. `undo` is
/// best-effort: a failing compensating delete is logged and skipped so the
/// original error still reaches the caller.
#[derive(Debug, Default)]
pub struct WriteLedger {
    written: Vec<String>,
}

impl WriteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, path: impl Into<String>) {
        self.written.push(path.into());
    }

    pub fn is_empty(&self) -> bool {
        self.written.is_empty()
    }

    pub fn paths(&self) -> &[String] {
        &self.written
    }

    pub async fn undo(self, store: &dyn BlobStore) {
        for path in &self.written {
            if let Err(err) = store.delete(path).await {
                tracing::warn!(%path, error = %err, "compensating blob delete failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;

    #[test]
    fn stored_name_is_deterministic() {
        let a = StoredName::derive(b"hello", "poster.JPG");
        let b = StoredName::derive(b"hello", "poster.JPG");
        assert_eq!(a, b);
    }

    #[test]
    fn stored_name_keeps_lowercased_extension() {
        let name = StoredName::derive(b"hello", "Poster.JPG");
        assert!(name.as_str().ends_with(".jpg"));
        assert_eq!(name.as_str().len(), 64 + 4);
    }

    #[test]
    fn stored_name_without_extension_is_bare_digest() {
        let name = StoredName::derive(b"hello", "trailer");
        assert_eq!(name.as_str().len(), 64);
    }

    #[test]
    fn stored_name_tracks_content_not_filename() {
        let a = StoredName::derive(b"one", "f.mp4");
        let b = StoredName::derive(b"two", "f.mp4");
        assert_ne!(a, b);
    }

    #[test]
    fn upload_stored_name_matches_derive() {
        let upload = Upload::new("thumb.png", b"bytes".to_vec());
        assert_eq!(
            upload.stored_name(),
            StoredName::derive(b"bytes", "thumb.png")
        );
    }

    #[tokio::test]
    async fn ledger_undo_deletes_every_recorded_path() {
        let mut store = MockBlobStore::new();
        store
            .expect_delete()
            .withf(|path| path == "v1/a.jpg")
            .times(1)
            .returning(|_| Ok(()));
        store
            .expect_delete()
            .withf(|path| path == "v1/b.mp4")
            .times(1)
            .returning(|_| Ok(()));

        let mut ledger = WriteLedger::new();
        ledger.record("v1/a.jpg");
        ledger.record("v1/b.mp4");
        ledger.undo(&store).await;
    }

    #[tokio::test]
    async fn ledger_undo_continues_past_failures() {
        let mut store = MockBlobStore::new();
        store
            .expect_delete()
            .withf(|path| path == "v1/a.jpg")
            .times(1)
            .returning(|_| {
                Err(CatalogError::storage(
                    "v1/a.jpg",
                    std::io::Error::other("disk gone"),
                ))
            });
        store
            .expect_delete()
            .withf(|path| path == "v1/b.mp4")
            .times(1)
            .returning(|_| Ok(()));

        let mut ledger = WriteLedger::new();
        ledger.record("v1/a.jpg");
        ledger.record("v1/b.mp4");
        ledger.undo(&store).await;
    }
}
