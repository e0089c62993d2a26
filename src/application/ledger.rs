use crate::domain::ledger::{LedgerAccount, LedgerBalance, LedgerEntry};
use crate::domain::ports::LedgerClientBox;
use crate::error::{PaymentError, Result};
use tracing::debug;

/// Read-only queries over a merchant's remote mutation log.
pub struct LedgerService {
    client: LedgerClientBox,
}

impl LedgerService {
    pub fn new(client: LedgerClientBox) -> Self {
        Self { client }
    }

    /// Returns the most recent mutation, or `NotFound` when the log is empty.
    pub async fn latest_transaction(&self, account: &LedgerAccount) -> Result<LedgerEntry> {
        let entries = self.client.mutations(account).await?;
        debug!(merchant = %account.merchant, entries = entries.len(), "mutation log read");
        entries.into_iter().next().ok_or_else(|| {
            PaymentError::NotFound(format!(
                "no transactions for merchant {}",
                account.merchant
            ))
        })
    }

    /// Returns the balance reported alongside the most recent mutation.
    ///
    /// A balance the gateway sends as `null` is passed through; only a missing
    /// field is `NotFound`.
    pub async fn balance(&self, account: &LedgerAccount) -> Result<LedgerBalance> {
        let latest = self.latest_transaction(account).await?;
        latest
            .balance
            .map(|balance| LedgerBalance { balance })
            .ok_or_else(|| {
                PaymentError::NotFound(format!(
                    "latest transaction for merchant {} carries no balance",
                    account.merchant
                ))
            })
    }
}
