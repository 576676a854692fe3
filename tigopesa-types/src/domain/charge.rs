//! Charge domain types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// A Tanzanian mobile subscriber number: `255` followed by nine digits.
///
/// Validated on construction; serde round-trips through the validated form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Msisdn(String);

impl Msisdn {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let valid = value.len() == 12
            && value.starts_with("255")
            && value.bytes().all(|b| b.is_ascii_digit());
        if !valid {
            return Err(DomainError::InvalidMsisdn(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Msisdn {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Msisdn {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Msisdn> for String {
    fn from(msisdn: Msisdn) -> String {
        msisdn.0
    }
}

impl fmt::Display for Msisdn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A customer charge request as carried by the request queue.
///
/// `reference` is caller-assigned and must be unique per logical charge
/// attempt: it is the sole correlation key between the charge call and the
/// later webhook confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeRequest {
    /// Customer MSISDN to be charged
    pub msisdn: Msisdn,
    /// Amount to charge, in TZS
    pub amount: i64,
    /// Caller-assigned correlation key
    pub reference: String,
    /// Free-form remarks forwarded to the provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl ChargeRequest {
    pub fn new(
        msisdn: Msisdn,
        amount: i64,
        reference: impl Into<String>,
        remarks: Option<String>,
    ) -> Result<Self, DomainError> {
        if amount <= 0 {
            return Err(DomainError::NonPositiveAmount(amount));
        }
        let reference = reference.into();
        if reference.trim().is_empty() {
            return Err(DomainError::EmptyReference);
        }
        Ok(Self {
            msisdn,
            amount,
            reference,
            remarks,
        })
    }
}

/// Outcome of a charge as reported by the provider's webhook, carried by
/// the result queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeResult {
    /// True if the customer was charged
    pub status: bool,
    /// Provider-side transaction ID
    pub transaction_id: String,
    /// The correlation reference of the original charge request
    pub reference: String,
    /// Amount charged, in TZS
    pub amount: i64,
}

/// Bearer token returned by the provider's token endpoint.
///
/// Ephemeral: fetched fresh per charge attempt, never cached or persisted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthToken {
    pub token: String,
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: u64,
}

/// Result of a successful transaction reversal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reversal {
    pub description: String,
    pub dm_reference: String,
    pub reference: String,
    pub transaction_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_msisdn() {
        let msisdn = Msisdn::new("255123456789").unwrap();
        assert_eq!(msisdn.as_str(), "255123456789");
    }

    #[test]
    fn test_msisdn_wrong_prefix_fails() {
        assert!(matches!(
            Msisdn::new("254123456789"),
            Err(DomainError::InvalidMsisdn(_))
        ));
    }

    #[test]
    fn test_msisdn_wrong_length_fails() {
        assert!(Msisdn::new("25512345678").is_err());
        assert!(Msisdn::new("2551234567890").is_err());
    }

    #[test]
    fn test_msisdn_non_digit_fails() {
        assert!(Msisdn::new("25512345678a").is_err());
    }

    #[test]
    fn test_charge_request_positive_amount() {
        let msisdn = Msisdn::new("255123456789").unwrap();
        let request = ChargeRequest::new(msisdn, 5000, "ref-1", None).unwrap();
        assert_eq!(request.amount, 5000);
    }

    #[test]
    fn test_charge_request_zero_amount_fails() {
        let msisdn = Msisdn::new("255123456789").unwrap();
        assert!(matches!(
            ChargeRequest::new(msisdn, 0, "ref-1", None),
            Err(DomainError::NonPositiveAmount(0))
        ));
    }

    #[test]
    fn test_charge_request_empty_reference_fails() {
        let msisdn = Msisdn::new("255123456789").unwrap();
        assert!(matches!(
            ChargeRequest::new(msisdn, 100, "  ", None),
            Err(DomainError::EmptyReference)
        ));
    }

    #[test]
    fn test_msisdn_serde_rejects_invalid() {
        let result: Result<Msisdn, _> = serde_json::from_str("\"not-a-number\"");
        assert!(result.is_err());
    }
}
