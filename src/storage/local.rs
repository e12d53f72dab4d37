//! Local-disk object store backing `/uploads`.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use super::{MAX_OBJECT_BYTES, ObjectStore, StorageError, extension_for};

pub struct LocalStore {
    root: PathBuf,
    public_base: String,
}

impl LocalStore {
    #[must_use]
    pub fn new(root: PathBuf, public_base: impl Into<String>) -> Self {
        Self { root, public_base: public_base.into() }
    }

    /// Resolve a public URL back to a path under the store root. Rejects
    /// URLs outside `public_base` and any path-traversal components.
    fn path_for(&self, public_url: &str) -> Result<PathBuf, StorageError> {
        let rel = public_url
            .strip_prefix(&self.public_base)
            .and_then(|r| r.strip_prefix('/'))
            .ok_or_else(|| StorageError::ForeignUrl(public_url.to_owned()))?;

        let rel_path = Path::new(rel);
        if rel_path
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::ForeignUrl(public_url.to_owned()));
        }

        Ok(self.root.join(rel_path))
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn put(&self, bucket: &str, content_type: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let ext = extension_for(content_type)
            .ok_or_else(|| StorageError::UnsupportedType(content_type.to_owned()))?;
        if bytes.len() > MAX_OBJECT_BYTES {
            return Err(StorageError::TooLarge(bytes.len()));
        }

        let dir = self.root.join(bucket);
        tokio::fs::create_dir_all(&dir).await?;

        let name = format!("{}.{ext}", Uuid::new_v4());
        tokio::fs::write(dir.join(&name), bytes).await?;

        Ok(format!("{}/{bucket}/{name}", self.public_base))
    }

    async fn delete(&self, public_url: &str) -> Result<(), StorageError> {
        let path = self.path_for(public_url)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

#[cfg(test)]
#[path = "local_test.rs"]
mod tests;
