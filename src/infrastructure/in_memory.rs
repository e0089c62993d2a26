use crate::domain::ledger::{LedgerAccount, LedgerEntry};
use crate::domain::ports::{ImagePublisher, LedgerClient, MarkSource};
use crate::domain::transaction::ImageLocator;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Serves a fixed brand mark held in memory.
///
/// Clones share the fetch counter, so a clone handed to an engine can be
/// inspected through the handle kept by the test.
#[derive(Default, Clone)]
pub struct StaticMarkSource {
    bytes: Arc<Vec<u8>>,
    fetches: Arc<AtomicUsize>,
}

impl StaticMarkSource {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::new(bytes),
            fetches: Arc::default(),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarkSource for StaticMarkSource {
    async fn fetch(&self, _locator: &str) -> Result<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.bytes.as_ref().clone())
    }
}

/// A mark source that always fails, standing in for an unreachable host.
#[derive(Debug, Clone)]
pub struct FailingMarkSource {
    reason: String,
}

impl FailingMarkSource {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl MarkSource for FailingMarkSource {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>> {
        Err(PaymentError::MarkFetch(format!("{locator}: {}", self.reason)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedImage {
    pub file_name: String,
    pub png: Vec<u8>,
}

/// Keeps published images in memory and returns URLs under `base_url`.
#[derive(Default, Clone)]
pub struct InMemoryPublisher {
    base_url: String,
    images: Arc<RwLock<Vec<PublishedImage>>>,
}

impl InMemoryPublisher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            images: Arc::default(),
        }
    }

    pub async fn published(&self) -> Vec<PublishedImage> {
        self.images.read().await.clone()
    }
}

#[async_trait]
impl ImagePublisher for InMemoryPublisher {
    async fn publish(&self, png: Vec<u8>, file_name: &str) -> Result<ImageLocator> {
        let mut images = self.images.write().await;
        images.push(PublishedImage {
            file_name: file_name.to_string(),
            png,
        });
        Ok(ImageLocator {
            url: format!("{}/{file_name}", self.base_url.trim_end_matches('/')),
        })
    }
}

#[derive(Debug, Clone)]
pub struct FailingPublisher {
    reason: String,
}

impl FailingPublisher {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ImagePublisher for FailingPublisher {
    async fn publish(&self, _png: Vec<u8>, file_name: &str) -> Result<ImageLocator> {
        Err(PaymentError::Publish(format!("{file_name}: {}", self.reason)))
    }
}

/// A thread-safe in-memory mutation log keyed by merchant and key.
///
/// Entries are kept newest first, like the remote gateway returns them.
#[derive(Default, Clone)]
pub struct InMemoryLedger {
    logs: Arc<RwLock<HashMap<(String, String), Vec<LedgerEntry>>>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a mutation; it becomes the most recent entry.
    pub async fn record(&self, account: &LedgerAccount, entry: LedgerEntry) {
        let mut logs = self.logs.write().await;
        logs.entry((account.merchant.clone(), account.key.clone()))
            .or_default()
            .insert(0, entry);
    }
}

#[async_trait]
impl LedgerClient for InMemoryLedger {
    async fn mutations(&self, account: &LedgerAccount) -> Result<Vec<LedgerEntry>> {
        let logs = self.logs.read().await;
        Ok(logs
            .get(&(account.merchant.clone(), account.key.clone()))
            .cloned()
            .unwrap_or_default())
    }
}
