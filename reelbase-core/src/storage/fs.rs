//! Filesystem-backed blob store.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::error::{CatalogError, Result};
use crate::storage::BlobStore;

/// Root directory for the catalog blob store.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StorageRoot(PathBuf);

impl StorageRoot {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Debug for StorageRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StorageRoot").field(&self.0).finish()
    }
}

/// Blob store rooted at a local directory.
///
/// Blob paths are relative, slash-separated, and namespaced per entity
/// (`<video-id>/<stored-name>`); traversal components are rejected before
/// touching the filesystem.
#[derive(Clone, Debug)]
pub struct FsBlobStore {
    root: StorageRoot,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: StorageRoot::new(root.into()),
        }
    }

    pub fn root(&self) -> &StorageRoot {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        if path.is_empty() {
            return Err(CatalogError::validation("path", "blob path is empty"));
        }
        let relative = Path::new(path);
        let clean = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !clean {
            return Err(CatalogError::validation(
                "path",
                format!("blob path {path:?} must be relative without traversal"),
            ));
        }
        Ok(self.root.as_path().join(relative))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<()> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CatalogError::storage(path, e))?;
        }
        tokio::fs::write(&target, bytes)
            .await
            .map_err(|e| CatalogError::storage(path, e))?;
        tracing::debug!(%path, bytes = bytes.len(), "stored blob");
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let target = self.resolve(path)?;
        match tokio::fs::remove_file(&target).await {
            Ok(()) => {
                tracing::debug!(%path, "deleted blob");
                Ok(())
            }
            // Absent path is a no-op: compensating deletes may duplicate
            // other deletes.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CatalogError::storage(path, e)),
        }
    }

    async fn contains(&self, path: &str) -> Result<bool> {
        let target = self.resolve(path)?;
        tokio::fs::try_exists(&target)
            .await
            .map_err(|e| CatalogError::storage(path, e))
    }
}
