//! Structured view of a QRIS payment payload.
//!
//! A payload is a flat run of tag-length-value fields: a 2-digit tag, a
//! 2-digit decimal length, then exactly that many characters of value. The last
//! field is always the checksum (`63`, length `04`).

use super::amount::Amount;
use super::checksum::checksum;
use crate::error::{PaymentError, Result};
use std::fmt;

pub const CHECKSUM_TAG: &str = "63";
pub const POINT_OF_INITIATION_TAG: &str = "01";
pub const AMOUNT_TAG: &str = "54";
pub const COUNTRY_TAG: &str = "58";

const STATIC_INITIATION: &str = "11";
const DYNAMIC_INITIATION: &str = "12";
const COUNTRY_CODE: &str = "ID";
const CHECKSUM_LEN: usize = 4;
const MAX_VALUE_LEN: usize = 99;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlvField {
    tag: String,
    value: String,
}

impl TlvField {
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let tag = tag.into();
        let value = value.into();
        if !is_two_digits(&tag) {
            return Err(PaymentError::MalformedPayload(format!(
                "tag '{tag}' is not two digits"
            )));
        }
        if !value.is_ascii() {
            return Err(PaymentError::MalformedPayload(format!(
                "field {tag} holds non-ASCII text"
            )));
        }
        if value.len() > MAX_VALUE_LEN {
            return Err(PaymentError::MalformedPayload(format!(
                "field {tag} holds {} characters, at most {MAX_VALUE_LEN} fit the length prefix",
                value.len()
            )));
        }
        Ok(Self { tag, value })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for TlvField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}{}", self.tag, self.value.len(), self.value)
    }
}

/// A parsed payload: every field except the trailing checksum, plus the
/// checksum it declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    fields: Vec<TlvField>,
    checksum: String,
}

impl Payload {
    /// Parses a payload string into its ordered fields.
    ///
    /// Every declared length must be covered by the remaining input and the
    /// final field must be the `6304` checksum.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if !input.is_ascii() {
            return Err(PaymentError::MalformedPayload(
                "payload must be ASCII".to_string(),
            ));
        }

        let mut fields = Vec::new();
        let mut offset = 0;
        while offset < input.len() {
            let rest = &input[offset..];
            if rest.len() < 4 {
                return Err(PaymentError::MalformedPayload(format!(
                    "truncated field header at offset {offset}"
                )));
            }
            let (tag, len) = (&rest[..2], &rest[2..4]);
            if !is_two_digits(tag) || !is_two_digits(len) {
                return Err(PaymentError::MalformedPayload(format!(
                    "invalid field header '{}' at offset {offset}",
                    &rest[..4]
                )));
            }
            let len: usize = len
                .parse()
                .map_err(|_| PaymentError::MalformedPayload(format!("bad length at offset {offset}")))?;
            if rest.len() < 4 + len {
                return Err(PaymentError::MalformedPayload(format!(
                    "field {tag} at offset {offset} declares {len} characters but only {} remain",
                    rest.len() - 4
                )));
            }
            fields.push(TlvField {
                tag: tag.to_string(),
                value: rest[4..4 + len].to_string(),
            });
            offset += 4 + len;
        }

        let checksum = match fields.pop() {
            Some(field) if field.tag == CHECKSUM_TAG && field.value.len() == CHECKSUM_LEN => {
                field.value
            }
            _ => {
                return Err(PaymentError::MalformedPayload(
                    "payload must end with a 6304 checksum field".to_string(),
                ));
            }
        };

        Ok(Self { fields, checksum })
    }

    pub fn fields(&self) -> &[TlvField] {
        &self.fields
    }

    pub fn field(&self, tag: &str) -> Option<&TlvField> {
        self.fields.iter().find(|f| f.tag == tag)
    }

    pub fn declared_checksum(&self) -> &str {
        &self.checksum
    }

    pub fn is_dynamic(&self) -> bool {
        self.field(POINT_OF_INITIATION_TAG)
            .is_some_and(|f| f.value == DYNAMIC_INITIATION)
    }

    /// Whether the declared checksum matches the one recomputed from the fields.
    pub fn checksum_matches(&self) -> bool {
        self.checksum
            .eq_ignore_ascii_case(&checksum(&signed_text(&self.fields)))
    }

    /// Rewrites a static payload into a dynamic one carrying `amount`.
    ///
    /// The point-of-initiation field flips from `11` to `12`, an amount field is
    /// inserted right before the `5802ID` country field and the checksum is
    /// recomputed over the rebuilt text.
    pub fn to_dynamic(&self, amount: &Amount) -> Result<Payload> {
        let mut fields = self.fields.clone();

        let initiation = fields
            .iter_mut()
            .find(|f| f.tag == POINT_OF_INITIATION_TAG && f.value == STATIC_INITIATION)
            .ok_or_else(|| {
                PaymentError::MalformedPayload("static indicator 010211 not found".to_string())
            })?;
        initiation.value = DYNAMIC_INITIATION.to_string();

        if fields.iter().any(|f| f.tag == AMOUNT_TAG) {
            return Err(PaymentError::MalformedPayload(
                "static payload already carries an amount field".to_string(),
            ));
        }

        let anchors: Vec<usize> = fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.tag == COUNTRY_TAG && f.value == COUNTRY_CODE)
            .map(|(i, _)| i)
            .collect();
        let country = match anchors.as_slice() {
            [index] => *index,
            [] => {
                return Err(PaymentError::MalformedPayload(
                    "country marker 5802ID not found".to_string(),
                ));
            }
            _ => {
                return Err(PaymentError::MalformedPayload(format!(
                    "country marker 5802ID found {} times",
                    anchors.len()
                )));
            }
        };

        let amount_field = TlvField::new(AMOUNT_TAG, amount.to_tlv_value())
            .map_err(|e| PaymentError::AmountTooLarge(e.to_string()))?;
        fields.insert(country, amount_field);

        let checksum = checksum(&signed_text(&fields));
        Ok(Payload { fields, checksum })
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for field in &self.fields {
            write!(f, "{field}")?;
        }
        write!(f, "{CHECKSUM_TAG}{CHECKSUM_LEN:02}{}", self.checksum)
    }
}

/// The text the checksum covers: every field followed by the `6304` header.
fn signed_text(fields: &[TlvField]) -> String {
    let mut text: String = fields.iter().map(ToString::to_string).collect();
    text.push_str(CHECKSUM_TAG);
    text.push_str(&format!("{CHECKSUM_LEN:02}"));
    text
}

fn is_two_digits(s: &str) -> bool {
    s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit())
}
