use super::ledger::{LedgerAccount, LedgerEntry};
use super::transaction::ImageLocator;
use crate::error::Result;
use async_trait::async_trait;

/// Fetches the raw bytes of the brand mark.
///
/// Implementations report every failure (transport, non-2xx, timeout) as
/// `PaymentError::MarkFetch`.
#[async_trait]
pub trait MarkSource: Send + Sync {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>>;
}

/// Stores rendered PNG bytes and returns a dereferenceable locator.
///
/// Implementations report every failure as `PaymentError::Publish`.
#[async_trait]
pub trait ImagePublisher: Send + Sync {
    async fn publish(&self, png: Vec<u8>, file_name: &str) -> Result<ImageLocator>;
}

/// Reads a merchant's mutation log, newest entry first.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn mutations(&self, account: &LedgerAccount) -> Result<Vec<LedgerEntry>>;
}

pub type MarkSourceBox = Box<dyn MarkSource>;
pub type ImagePublisherBox = Box<dyn ImagePublisher>;
pub type LedgerClientBox = Box<dyn LedgerClient>;
