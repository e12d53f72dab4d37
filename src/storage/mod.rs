//! Object storage for uploaded images.
//!
//! ARCHITECTURE
//! ============
//! Uploads (avatars, item photos) go through the `ObjectStore` trait so the
//! backend is swappable; the shipped backend writes to local disk and the
//! router serves the tree read-only under `/uploads`. Stored objects are
//! content-addressed by a fresh UUID, never by a client-supplied name.

mod local;

pub use local::LocalStore;

use async_trait::async_trait;

/// Upload size cap, in bytes.
pub const MAX_OBJECT_BYTES: usize = 5 * 1024 * 1024;

/// Bucket for profile avatars.
pub const BUCKET_AVATARS: &str = "avatars";
/// Bucket for listing photos.
pub const BUCKET_ITEM_PHOTOS: &str = "item-photos";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("unsupported content type: {0}")]
    UnsupportedType(String),
    #[error("object too large: {0} bytes")]
    TooLarge(usize),
    #[error("url not managed by this store: {0}")]
    ForeignUrl(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Map an image content type to its stored extension. Only the formats the
/// product accepts are listed.
#[must_use]
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store an object and return its public URL path.
    ///
    /// # Errors
    ///
    /// Rejects unsupported content types, oversized payloads, and I/O
    /// failures.
    async fn put(&self, bucket: &str, content_type: &str, bytes: &[u8]) -> Result<String, StorageError>;

    /// Delete an object by the public URL `put` returned. Deleting an
    /// already-missing object is not an error.
    ///
    /// # Errors
    ///
    /// Rejects URLs outside this store and I/O failures.
    async fn delete(&self, public_url: &str) -> Result<(), StorageError>;
}
