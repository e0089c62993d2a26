use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PaymentError>;

#[derive(Error, Diagnostic, Debug)]
pub enum PaymentError {
    #[error("Malformed payload: {0}")]
    #[diagnostic(
        code(qrispay::malformed_payload),
        help("supply a well-formed static QRIS payload")
    )]
    MalformedPayload(String),

    #[error("Amount too large: {0}")]
    #[diagnostic(code(qrispay::amount_too_large))]
    AmountTooLarge(String),

    #[error("Invalid amount: {0}")]
    #[diagnostic(code(qrispay::invalid_amount))]
    InvalidAmount(String),

    #[error("Encoding error: {0}")]
    #[diagnostic(code(qrispay::encoding))]
    Encoding(String),

    #[error("Compositing error: {0}")]
    #[diagnostic(
        code(qrispay::compositing),
        help("check the configured brand mark asset")
    )]
    Compositing(String),

    #[error("Mark fetch failed: {0}")]
    #[diagnostic(code(qrispay::mark_fetch))]
    MarkFetch(String),

    #[error("Publish failed: {0}")]
    #[diagnostic(code(qrispay::publish))]
    Publish(String),

    #[error("Not found: {0}")]
    #[diagnostic(code(qrispay::not_found))]
    NotFound(String),

    #[error("Ledger unavailable: {0}")]
    #[diagnostic(code(qrispay::ledger_unavailable))]
    LedgerUnavailable(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(qrispay::config))]
    Config(String),
}

/// Stable discriminator exposed to callers alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    #[serde(rename = "MalformedPayloadError")]
    MalformedPayload,
    #[serde(rename = "AmountTooLargeError")]
    AmountTooLarge,
    #[serde(rename = "InvalidAmountError")]
    InvalidAmount,
    #[serde(rename = "EncodingError")]
    Encoding,
    #[serde(rename = "CompositingError")]
    Compositing,
    #[serde(rename = "MarkFetchError")]
    MarkFetch,
    #[serde(rename = "PublishError")]
    Publish,
    NotFound,
    #[serde(rename = "LedgerUnavailableError")]
    LedgerUnavailable,
    #[serde(rename = "ConfigError")]
    Config,
}

impl PaymentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PaymentError::MalformedPayload(_) => ErrorKind::MalformedPayload,
            PaymentError::AmountTooLarge(_) => ErrorKind::AmountTooLarge,
            PaymentError::InvalidAmount(_) => ErrorKind::InvalidAmount,
            PaymentError::Encoding(_) => ErrorKind::Encoding,
            PaymentError::Compositing(_) => ErrorKind::Compositing,
            PaymentError::MarkFetch(_) => ErrorKind::MarkFetch,
            PaymentError::Publish(_) => ErrorKind::Publish,
            PaymentError::NotFound(_) => ErrorKind::NotFound,
            PaymentError::LedgerUnavailable(_) => ErrorKind::LedgerUnavailable,
            PaymentError::Config(_) => ErrorKind::Config,
        }
    }

    /// External dependency failures. Retrying the whole operation mints a new
    /// transaction identity.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentError::MarkFetch(_)
                | PaymentError::Publish(_)
                | PaymentError::LedgerUnavailable(_)
        )
    }
}
