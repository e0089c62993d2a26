use super::http::HttpMarkSource;
use crate::domain::ports::{ImagePublisher, MarkSource};
use crate::domain::transaction::ImageLocator;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Reads the brand mark from the local filesystem. A `file://` prefix is
/// accepted and stripped.
#[derive(Debug, Clone, Default)]
pub struct FileMarkSource;

#[async_trait]
impl MarkSource for FileMarkSource {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>> {
        let path = locator.strip_prefix("file://").unwrap_or(locator);
        tokio::fs::read(path)
            .await
            .map_err(|e| PaymentError::MarkFetch(format!("{path}: {e}")))
    }
}

/// Routes `http(s)://` locators to the network and everything else to disk.
#[derive(Clone)]
pub struct AnyMarkSource {
    http: HttpMarkSource,
    file: FileMarkSource,
}

impl AnyMarkSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: HttpMarkSource::new(timeout)?,
            file: FileMarkSource,
        })
    }
}

#[async_trait]
impl MarkSource for AnyMarkSource {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>> {
        if locator.starts_with("http://") || locator.starts_with("https://") {
            self.http.fetch(locator).await
        } else {
            self.file.fetch(locator).await
        }
    }
}

/// Publishes images by writing them into a directory and handing back a
/// `file://` URL.
#[derive(Debug, Clone)]
pub struct DirectoryPublisher {
    dir: PathBuf,
}

impl DirectoryPublisher {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl ImagePublisher for DirectoryPublisher {
    async fn publish(&self, png: Vec<u8>, file_name: &str) -> Result<ImageLocator> {
        if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name.starts_with('.') {
            return Err(PaymentError::Publish(format!(
                "refusing file name '{file_name}'"
            )));
        }

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| PaymentError::Publish(format!("{}: {e}", self.dir.display())))?;
        let path = self.dir.join(file_name);
        tokio::fs::write(&path, png)
            .await
            .map_err(|e| PaymentError::Publish(format!("{}: {e}", path.display())))?;
        let path = tokio::fs::canonicalize(&path)
            .await
            .map_err(|e| PaymentError::Publish(format!("{}: {e}", path.display())))?;

        Ok(ImageLocator {
            url: format!("file://{}", path.display()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_file_mark_source_reads_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logo.png");
        std::fs::write(&path, b"mark").unwrap();

        let source = FileMarkSource;
        let plain = source.fetch(path.to_str().unwrap()).await.unwrap();
        let prefixed = source
            .fetch(&format!("file://{}", path.display()))
            .await
            .unwrap();
        assert_eq!(plain, b"mark");
        assert_eq!(prefixed, b"mark");
    }

    #[tokio::test]
    async fn test_missing_mark_file_is_fetch_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.png");
        let result = FileMarkSource.fetch(path.to_str().unwrap()).await;
        assert!(matches!(result, Err(PaymentError::MarkFetch(_))));
    }

    #[tokio::test]
    async fn test_any_mark_source_routes_paths_to_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logo.png");
        std::fs::write(&path, b"disk").unwrap();

        let source = AnyMarkSource::new(Duration::from_secs(1)).unwrap();
        assert_eq!(source.fetch(path.to_str().unwrap()).await.unwrap(), b"disk");
    }

    #[tokio::test]
    async fn test_directory_publisher_writes_file() {
        let dir = tempdir().unwrap();
        let publisher = DirectoryPublisher::new(dir.path().join("out"));

        let locator = publisher.publish(vec![7, 7, 7], "qris-AB.png").await.unwrap();

        assert!(locator.url.starts_with("file://"));
        assert!(locator.url.ends_with("qris-AB.png"));
        let written = std::fs::read(dir.path().join("out").join("qris-AB.png")).unwrap();
        assert_eq!(written, vec![7, 7, 7]);
    }

    #[tokio::test]
    async fn test_directory_publisher_rejects_traversal() {
        let dir = tempdir().unwrap();
        let publisher = DirectoryPublisher::new(dir.path());
        let result = publisher.publish(vec![1], "../escape.png").await;
        assert!(matches!(result, Err(PaymentError::Publish(_))));
    }
}
