use crate::error::PaymentError;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A positive transaction amount requested by the payee.
///
/// Wraps `rust_decimal::Decimal` so that whole and fractional amounts keep
/// their exact digits all the way into the payload.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, PaymentError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(PaymentError::InvalidAmount(
                "Amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Minimal digit string used as the value of the amount field.
    ///
    /// No leading zeros, no trailing fractional zeros, and no separator when
    /// the amount is whole.
    pub fn to_tlv_value(&self) -> String {
        self.0.normalize().to_string()
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = PaymentError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl FromStr for Amount {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (whole, fraction) = match s.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (s, None),
        };
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty()
            || !all_digits(whole)
            || fraction.is_some_and(|f| f.is_empty() || !all_digits(f))
        {
            return Err(PaymentError::InvalidAmount(format!(
                "'{s}' is not a decimal amount"
            )));
        }

        // The text is well-formed, so a parse failure means it overflows the
        // decimal range.
        let value = Decimal::from_str(s).map_err(|_| {
            PaymentError::AmountTooLarge(format!("{} digits exceed the supported range", s.len()))
        })?;
        // `Decimal` rounds digits it cannot hold; the amount must survive intact.
        if value.normalize().to_string() != canonical(whole, fraction) {
            return Err(PaymentError::InvalidAmount(format!(
                "'{s}' carries more precision than an amount can hold"
            )));
        }
        Self::new(value)
    }
}

/// Digit text without leading zeros, trailing fractional zeros or a bare
/// separator.
fn canonical(whole: &str, fraction: Option<&str>) -> String {
    let whole = match whole.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };
    match fraction.map(|f| f.trim_end_matches('0')) {
        Some(f) if !f.is_empty() => format!("{whole}.{f}"),
        _ => whole.to_string(),
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_tlv_value())
    }
}

/// Written as a JSON number with exactly the digits of the amount field.
impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let number = serde_json::Number::from_str(&self.to_tlv_value())
            .map_err(<S::Error as serde::ser::Error>::custom)?;
        number.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_validation() {
        assert!(Amount::new(dec!(1.0)).is_ok());
        assert!(matches!(
            Amount::new(dec!(0.0)),
            Err(PaymentError::InvalidAmount(_))
        ));
        assert!(matches!(
            Amount::new(dec!(-1.0)),
            Err(PaymentError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_tlv_value_is_minimal() {
        assert_eq!(Amount::new(dec!(10000)).unwrap().to_tlv_value(), "10000");
        assert_eq!(Amount::new(dec!(100.00)).unwrap().to_tlv_value(), "100");
        assert_eq!(Amount::new(dec!(2500.50)).unwrap().to_tlv_value(), "2500.5");
        assert_eq!("000150".parse::<Amount>().unwrap().to_tlv_value(), "150");
    }

    #[test]
    fn test_parse_rejects_non_decimal_text() {
        for input in ["", "abc", "1,000", "-5", "1.", ".5", "1.2.3", "1e5"] {
            assert!(
                matches!(input.parse::<Amount>(), Err(PaymentError::InvalidAmount(_))),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_zero() {
        assert!(matches!(
            "0.00".parse::<Amount>(),
            Err(PaymentError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_parse_rejects_astronomical_amount() {
        let huge = format!("1{}", "0".repeat(100));
        assert!(matches!(
            huge.parse::<Amount>(),
            Err(PaymentError::AmountTooLarge(_))
        ));
    }

    #[test]
    fn test_parse_rejects_digits_beyond_decimal_precision() {
        let err = "1.000000000000000000000000000000001"
            .parse::<Amount>()
            .unwrap_err();
        assert!(matches!(err, PaymentError::InvalidAmount(_)));
        assert!(err.to_string().contains("precision"));

        let err = "0.00000000000000000000000000000001"
            .parse::<Amount>()
            .unwrap_err();
        assert!(err.to_string().contains("precision"));
    }

    #[test]
    fn test_parse_ignores_padding_zeros() {
        let amount = "0001.5000000000000000000000000000000000"
            .parse::<Amount>()
            .unwrap();
        assert_eq!(amount.to_tlv_value(), "1.5");
        assert_eq!("0.25".parse::<Amount>().unwrap().to_tlv_value(), "0.25");
    }

    #[test]
    fn test_serialized_amount_matches_tlv_digits() {
        let amount: Amount = "12345678901234567.89".parse().unwrap();
        assert_eq!(serde_json::to_string(&amount).unwrap(), "12345678901234567.89");

        let amount: Amount = "79228162514264337593543950335".parse().unwrap();
        assert_eq!(
            serde_json::to_string(&amount).unwrap(),
            "79228162514264337593543950335"
        );
    }

    #[test]
    fn test_amount_serializes_as_number() {
        let whole = Amount::new(dec!(10000)).unwrap();
        assert_eq!(serde_json::to_string(&whole).unwrap(), "10000");

        let fractional = Amount::new(dec!(12.5)).unwrap();
        assert_eq!(serde_json::to_string(&fractional).unwrap(), "12.5");
    }
}
