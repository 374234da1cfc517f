//! Filesystem outbox store.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::OutboxStore;
use crate::error::Result;

/// Filesystem-backed outbox directory
pub struct FilesystemOutbox {
    base_path: PathBuf,
}

impl FilesystemOutbox {
    /// Create a new filesystem outbox rooted at `base_path`
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

#[async_trait]
impl OutboxStore for FilesystemOutbox {
    async fn write_text(&self, name: &str, content: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.base_path).await?;

        let path = self.base_path.join(name);
        let mut file = fs::File::create(&path).await?;
        file.write_all(content.as_bytes()).await?;
        file.sync_all().await?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_text_creates_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemOutbox::new(dir.path().join("outbox"));

        let path = store.write_text("notice.eml", "Subject: x\n\nbody").await.unwrap();

        assert!(path.ends_with("notice.eml"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Subject: x\n\nbody");
    }

    #[tokio::test]
    async fn test_write_text_fails_when_base_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, "not a directory").unwrap();

        let store = FilesystemOutbox::new(&blocker);
        assert!(store.write_text("notice.eml", "x").await.is_err());
    }
}
