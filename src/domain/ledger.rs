use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Credentials addressing one merchant's mutation log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerAccount {
    pub merchant: String,
    pub key: String,
}

impl LedgerAccount {
    pub fn new(merchant: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            merchant: merchant.into(),
            key: key.into(),
        }
    }
}

/// One mutation from the remote ledger, newest first in the log.
///
/// Numeric fields arrive as strings or numbers depending on the gateway, so
/// they are kept as text. Unknown fields pass through untouched.
///
/// `balance` tells an absent field (`None`) apart from an explicit `null`
/// (`Some(None)`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LedgerEntry {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub qris: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub issuer_reff: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub buyer_reff: Option<String>,
    #[serde(default, deserialize_with = "present_lenient_string", skip_serializing_if = "Option::is_none")]
    pub balance: Option<Option<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerBalance {
    pub balance: Option<String>,
}

/// Only called when the field is present, so `null` becomes `Some(None)`.
fn present_lenient_string<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_string(deserializer).map(Some)
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_accepts_numbers_and_strings() {
        let json = r#"{
            "date": "2026-10-19 10:00:00",
            "amount": 10000,
            "type": "CR",
            "qris": "static",
            "brand_name": "DANA",
            "issuer_reff": "123",
            "buyer_reff": "BUYER",
            "balance": "250000"
        }"#;
        let entry: LedgerEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.amount.as_deref(), Some("10000"));
        assert_eq!(entry.kind.as_deref(), Some("CR"));
        assert_eq!(entry.balance, Some(Some("250000".to_string())));
        assert!(entry.extra.is_empty());
    }

    #[test]
    fn test_entry_preserves_unknown_fields() {
        let json = r#"{"amount": "500", "channel": "ovo"}"#;
        let entry: LedgerEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.balance, None);
        assert_eq!(entry.extra["channel"], "ovo");

        let back = serde_json::to_value(&entry).unwrap();
        assert_eq!(back["channel"], "ovo");
        assert_eq!(back["amount"], "500");
        assert!(back.get("balance").is_none());
    }

    #[test]
    fn test_entry_keeps_null_balance_apart_from_missing() {
        let json = r#"{"amount": "500", "balance": null}"#;
        let entry: LedgerEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.balance, Some(None));
        assert!(entry.extra.is_empty());

        let back = serde_json::to_value(&entry).unwrap();
        assert!(back["balance"].is_null());
        assert!(back.get("balance").is_some());
    }

    #[test]
    fn test_entry_rejects_nested_values_in_known_fields() {
        let json = r#"{"amount": {"value": 1}}"#;
        assert!(serde_json::from_str::<LedgerEntry>(json).is_err());
    }
}
