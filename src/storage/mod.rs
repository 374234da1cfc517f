//! Outbox file storage.

pub mod filesystem;

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::Result;

/// Durable store for publication notice files.
///
/// Implementations create the backing directory if absent and report a
/// fatal error when the medium is unavailable; the publish transaction
/// treats any failure here as grounds for a full rollback.
#[async_trait]
pub trait OutboxStore: Send + Sync {
    /// Write a text file under the store, returning the full path written.
    async fn write_text(&self, name: &str, content: &str) -> Result<PathBuf>;
}
