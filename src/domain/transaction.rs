use super::amount::Amount;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::Serialize;

/// Bytes of entropy behind each transaction identifier.
pub const TRANSACTION_ID_BYTES: usize = 5;
/// How long a minted payment code stays payable.
pub const EXPIRY_WINDOW_MINUTES: i64 = 30;

/// Identity and deadline minted for a single creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionTicket {
    pub transaction_id: String,
    pub expires_at: DateTime<Utc>,
}

impl TransactionTicket {
    /// Draws a fresh identifier from the OS entropy source and stamps the
    /// expiry relative to the current clock.
    pub fn issue() -> Self {
        Self::issue_at(Utc::now())
    }

    pub fn issue_at(now: DateTime<Utc>) -> Self {
        let mut bytes = [0u8; TRANSACTION_ID_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self {
            transaction_id: hex::encode_upper(bytes),
            expires_at: now + Duration::minutes(EXPIRY_WINDOW_MINUTES),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageLocator {
    pub url: String,
}

/// The result handed back to the caller once a payment code is published.
///
/// Immutable once built; persistence and expiry enforcement belong to the
/// caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub transaction_id: String,
    pub amount: Amount,
    pub expires_at: DateTime<Utc>,
    pub image_locator: ImageLocator,
}

impl TransactionRecord {
    pub fn new(ticket: TransactionTicket, amount: Amount, image_locator: ImageLocator) -> Self {
        Self {
            transaction_id: ticket.transaction_id,
            amount,
            expires_at: ticket.expires_at,
            image_locator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ticket_id_is_uppercase_hex() {
        let ticket = TransactionTicket::issue();
        assert_eq!(ticket.transaction_id.len(), TRANSACTION_ID_BYTES * 2);
        assert!(
            ticket
                .transaction_id
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
        );
    }

    #[test]
    fn test_ticket_expires_after_window() {
        let now = Utc::now();
        let ticket = TransactionTicket::issue_at(now);
        assert_eq!(ticket.expires_at - now, Duration::minutes(30));
    }

    #[test]
    fn test_tickets_are_unique() {
        let ids: std::collections::HashSet<String> = (0..64)
            .map(|_| TransactionTicket::issue().transaction_id)
            .collect();
        assert_eq!(ids.len(), 64);
    }

    #[test]
    fn test_record_serialization_shape() {
        let ticket = TransactionTicket {
            transaction_id: "0A1B2C3D4E".to_string(),
            expires_at: DateTime::parse_from_rfc3339("2026-01-01T10:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
        };
        let record = TransactionRecord::new(
            ticket,
            Amount::new(dec!(10000)).unwrap(),
            ImageLocator {
                url: "https://img.example/qris.png".to_string(),
            },
        );

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["transactionId"], "0A1B2C3D4E");
        assert_eq!(json["amount"], 10000);
        assert_eq!(json["expiresAt"], "2026-01-01T10:30:00Z");
        assert_eq!(json["imageLocator"]["url"], "https://img.example/qris.png");
    }
}
