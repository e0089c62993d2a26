use crate::config::EngineConfig;
use crate::domain::amount::Amount;
use crate::domain::payload::Payload;
use crate::domain::ports::{ImagePublisherBox, MarkSourceBox};
use crate::domain::transaction::{TransactionRecord, TransactionTicket};
use crate::error::{PaymentError, Result};
use crate::imaging::{overlay, render};
use tracing::{debug, info, warn};

/// Builds dynamic payment codes.
///
/// `PaymentEngine` owns the pipeline settings and the two external
/// capabilities it needs: fetching the brand mark and publishing the final
/// image. It holds no mutable state, so one engine can serve concurrent
/// requests.
pub struct PaymentEngine {
    config: EngineConfig,
    mark_source: MarkSourceBox,
    publisher: ImagePublisherBox,
}

impl PaymentEngine {
    /// Creates a new `PaymentEngine` after validating `config`.
    ///
    /// # Arguments
    ///
    /// * `config` - Mark address, mark size and raster settings.
    /// * `mark_source` - Where the brand mark bytes come from.
    /// * `publisher` - Where the finished image is stored.
    pub fn new(
        config: EngineConfig,
        mark_source: MarkSourceBox,
        publisher: ImagePublisherBox,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            mark_source,
            publisher,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Creates a payment object for `amount` from a static payload.
    ///
    /// Every call mints a new transaction identity and a new image, even for
    /// identical input. The first failing step aborts the call and no record
    /// is returned.
    pub async fn create_payment(
        &self,
        amount: Amount,
        static_payload: &str,
    ) -> Result<TransactionRecord> {
        let payload = Payload::parse(static_payload)?;
        if !payload.checksum_matches() {
            warn!(
                declared = payload.declared_checksum(),
                "static payload checksum does not verify, recomputing"
            );
        }
        let dynamic = payload.to_dynamic(&amount)?.to_string();
        debug!(length = dynamic.len(), "payload rewritten to dynamic");

        let code = render(
            &dynamic,
            self.config.error_correction,
            self.config.module_scale,
            self.config.quiet_zone,
        )?;
        debug!(width = code.width(), "matrix code rendered");

        let mark = self
            .mark_source
            .fetch(&self.config.mark_locator)
            .await
            .inspect_err(|e| warn!(error = %e, "brand mark fetch failed"))?;
        debug!(bytes = mark.len(), "brand mark fetched");

        let png = overlay(code, &mark, self.config.mark_width_ratio)?.to_png()?;

        let ticket = TransactionTicket::issue();
        let file_name = format!("qris-{}.png", ticket.transaction_id);
        let locator = self
            .publisher
            .publish(png, &file_name)
            .await
            .inspect_err(|e| warn!(error = %e, "image publish failed"))?;
        if locator.url.is_empty() {
            return Err(PaymentError::Publish(
                "publisher returned an empty locator".to_string(),
            ));
        }

        info!(
            transaction_id = %ticket.transaction_id,
            amount = %amount,
            url = %locator.url,
            "payment object created"
        );
        Ok(TransactionRecord::new(ticket, amount, locator))
    }

    /// Same as [`create_payment`](Self::create_payment) for an amount given
    /// as text.
    pub async fn create_payment_from_text(
        &self,
        amount: &str,
        static_payload: &str,
    ) -> Result<TransactionRecord> {
        let amount: Amount = amount.parse()?;
        self.create_payment(amount, static_payload).await
    }
}
