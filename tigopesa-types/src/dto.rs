//! Request objects crossing the provider API boundary.

use crate::domain::Msisdn;

/// Merchant credentials for the provider's endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Everything the biller-pay endpoint needs for one charge call.
///
/// The provider wants the bearer token AND the merchant credential headers
/// on the same request.
#[derive(Debug, Clone)]
pub struct ChargeCommand {
    /// Bearer token from a fresh authenticate call
    pub token: String,
    pub username: String,
    pub password: String,
    /// Customer MSISDN to charge
    pub msisdn: Msisdn,
    /// The merchant's biller MSISDN
    pub biller_msisdn: Msisdn,
    /// Amount in TZS
    pub amount: i64,
    /// Correlation reference, already prefixed with the biller code
    pub reference: String,
    pub remarks: Option<String>,
}

/// Everything the reversal endpoint needs to undo a prior charge.
#[derive(Debug, Clone)]
pub struct ReversalCommand {
    pub token: String,
    pub username: String,
    pub password: String,
    /// Customer MSISDN of the original charge
    pub msisdn: Msisdn,
    /// The merchant's channel MSISDN
    pub channel_msisdn: Msisdn,
    pub channel_pin: String,
    /// Amount in TZS
    pub amount: i64,
    /// Provider transaction ID of the charge being reversed
    pub transaction_id: String,
    /// Correlation reference for the reversal itself
    pub reference: String,
    /// Reference of the original purchase
    pub purchase_reference: String,
}
