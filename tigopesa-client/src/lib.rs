//! # TigoPesa Client
//!
//! A typed Rust client for the TigoPesa biller API, implementing the
//! [`ProviderApi`] port.
//!
//! The provider exposes two API families with different error envelopes:
//! the OAuth-style token endpoint (`{error, error_description}`) and the
//! JSON biller endpoints (`{ResponseCode, ResponseDescription,
//! ReferenceID}`). Both shapes are normalized into [`ProviderError`]
//! through the response code catalog, so callers never need to know which
//! family they hit.

use std::time::Duration;

use reqwest::{Client, StatusCode, header::HeaderMap};
use serde::{Deserialize, Serialize};

use tigopesa_types::{
    AuthToken, ChargeCommand, Credentials, ProviderApi, ProviderError, ResponseCode, Reversal,
    ReversalCommand,
};

const TOKEN_PATH: &str = "/token";
const BILLER_PAY_PATH: &str = "/API/BillerPayment/BillerPay";
const HEARTBEAT_PATH: &str = "/API/Heartbeat/Heartbeat";
// The provider's path really is spelled this way.
const REVERSE_PATH: &str = "/API/Reverse/ReverseTransacation";

/// Fixed timeout applied to every outbound call. Exceeding it is a
/// transport failure.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// TigoPesa API client.
pub struct TigoPesaClient {
    base_url: String,
    http: Client,
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct TokenForm<'a> {
    user_name: &'a str,
    password: &'a str,
    grant_type: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    token_type: String,
    expires_in: u64,
}

#[derive(Serialize)]
struct BillerPayRequest<'a> {
    #[serde(rename = "CustomerMSISDN")]
    customer_msisdn: &'a str,
    #[serde(rename = "BillerMSISDN")]
    biller_msisdn: &'a str,
    #[serde(rename = "Amount")]
    amount: i64,
    #[serde(rename = "Remarks")]
    remarks: &'a str,
    #[serde(rename = "ReferenceID")]
    reference: &'a str,
}

#[derive(Serialize)]
struct HeartbeatRequest<'a> {
    #[serde(rename = "ReferenceID")]
    reference: &'a str,
}

#[derive(Deserialize)]
struct HeartbeatResponse {
    #[serde(rename = "ReferenceID", default)]
    reference: Option<String>,
}

#[derive(Serialize)]
struct ReverseRequest<'a> {
    #[serde(rename = "CustomerMSISDN")]
    customer_msisdn: &'a str,
    #[serde(rename = "ChannelMSISDN")]
    channel_msisdn: &'a str,
    #[serde(rename = "ChannelPIN")]
    channel_pin: &'a str,
    #[serde(rename = "Amount")]
    amount: i64,
    #[serde(rename = "MFSTransactionID")]
    transaction_id: &'a str,
    #[serde(rename = "ReferenceID")]
    reference: &'a str,
    #[serde(rename = "PurchaseReferenceID")]
    purchase_reference: &'a str,
}

#[derive(Deserialize)]
struct ReverseResponse {
    #[serde(rename = "ResponseCode")]
    code: String,
    #[serde(rename = "ResponseDescription", default)]
    description: Option<String>,
    #[serde(rename = "DMReferenceID", default)]
    dm_reference: Option<String>,
    #[serde(rename = "ReferenceID", default)]
    reference: Option<String>,
    #[serde(rename = "MFSTransactionID", default)]
    transaction_id: Option<String>,
}

/// The two provider error envelopes, discriminated by field presence.
///
/// Order matters: a body carrying both shapes resolves as OAuth, matching
/// the token endpoint's precedence.
#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorEnvelope {
    OAuth {
        error: String,
        #[serde(default)]
        error_description: Option<String>,
    },
    Biller {
        #[serde(rename = "ResponseCode")]
        code: String,
        #[serde(rename = "ResponseDescription", default)]
        description: Option<String>,
        #[serde(rename = "ReferenceID", default)]
        reference: Option<String>,
    },
}

/// Normalizes a failed provider response into a [`ProviderError`].
///
/// Catalog lookup is exact; a well-formed envelope with an uncataloged code
/// still becomes a rejection, coded UNKNOWN_ERROR. Bodies matching neither
/// envelope are wrapped raw.
fn error_from_body(status: StatusCode, body: &str) -> ProviderError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope::OAuth {
            error,
            error_description,
        }) => ProviderError::Rejected {
            code: ResponseCode::from_wire(&error).unwrap_or(ResponseCode::UnknownError),
            message: error_description.unwrap_or_else(|| format!("HTTP {status}")),
            reference: None,
        },
        Ok(ErrorEnvelope::Biller {
            code,
            description,
            reference,
        }) => ProviderError::Rejected {
            code: ResponseCode::from_wire(&code).unwrap_or(ResponseCode::UnknownError),
            message: description.unwrap_or_else(|| format!("HTTP {status}")),
            reference,
        },
        Err(_) => ProviderError::unknown(format!("HTTP {status}: {body}")),
    }
}

impl TigoPesaClient {
    /// Creates a new client for the given provider base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Obtains an access token via the credential grant.
    pub async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthToken, ProviderError> {
        let form = TokenForm {
            user_name: &credentials.username,
            password: &credentials.password,
            grant_type: "password",
        };
        tracing::debug!(username = %credentials.username, "sending auth request");

        let response = self
            .http
            .post(format!("{}{}", self.base_url, TOKEN_PATH))
            .header("Cache-Control", "no-cache")
            .form(&form)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| ProviderError::transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::transport(e.to_string()))?;

        // The token endpoint reports errors both with non-2xx statuses and
        // inside 200 bodies carrying an `error` field.
        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|_| ProviderError::unknown(format!("HTTP {status}: {body}")))?;
        if !status.is_success() || value.get("error").is_some() {
            return Err(error_from_body(status, &body));
        }

        let token: TokenResponse = serde_json::from_value(value)
            .map_err(|_| ProviderError::invalid_response(format!("unexpected token body: {body}")))?;
        tracing::debug!(token_type = %token.token_type, "auth success");
        Ok(AuthToken {
            token: token.access_token,
            token_type: token.token_type,
            expires_in: token.expires_in,
        })
    }

    /// Submits a customer charge through the biller-pay endpoint.
    ///
    /// Succeeds only when the provider answers `BILLER-18-0000-S`; the
    /// settlement itself is confirmed later through the webhook.
    pub async fn charge_customer(&self, charge: &ChargeCommand) -> Result<(), ProviderError> {
        let request = BillerPayRequest {
            customer_msisdn: charge.msisdn.as_str(),
            biller_msisdn: charge.biller_msisdn.as_str(),
            amount: charge.amount,
            remarks: charge.remarks.as_deref().unwrap_or(""),
            reference: &charge.reference,
        };
        tracing::debug!(reference = %charge.reference, amount = charge.amount, "sending charge request");

        let response = self
            .http
            .post(format!("{}{}", self.base_url, BILLER_PAY_PATH))
            .headers(biller_headers(&charge.username, &charge.password))
            .bearer_auth(&charge.token)
            .json(&request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| ProviderError::transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::transport(e.to_string()))?;

        match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(ErrorEnvelope::Biller { ref code, .. })
                if status.is_success() && code.as_str() == ResponseCode::Success.wire() =>
            {
                tracing::debug!(reference = %charge.reference, "charge accepted");
                Ok(())
            }
            _ => {
                tracing::debug!(reference = %charge.reference, %status, "charge rejected");
                Err(error_from_body(status, &body))
            }
        }
    }

    /// Probes the provider's heartbeat endpoint.
    ///
    /// The echoed reference must equal the one sent exactly; a mismatch is
    /// a correctness failure, not a transport failure.
    pub async fn check_heartbeat(
        &self,
        credentials: &Credentials,
        reference: &str,
    ) -> Result<(), ProviderError> {
        let request = HeartbeatRequest { reference };

        let response = self
            .http
            .post(format!("{}{}", self.base_url, HEARTBEAT_PATH))
            .headers(biller_headers(&credentials.username, &credentials.password))
            .json(&request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| ProviderError::transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::transport(e.to_string()))?;

        if !status.is_success() {
            return Err(error_from_body(status, &body));
        }

        let echoed = serde_json::from_str::<HeartbeatResponse>(&body)
            .ok()
            .and_then(|r| r.reference);
        if echoed.as_deref() != Some(reference) {
            return Err(ProviderError::invalid_response(
                "Invalid reference returned by server",
            ));
        }
        Ok(())
    }

    /// Reverses a previously settled charge.
    pub async fn reverse_transaction(
        &self,
        reversal: &ReversalCommand,
    ) -> Result<Reversal, ProviderError> {
        let request = ReverseRequest {
            customer_msisdn: reversal.msisdn.as_str(),
            channel_msisdn: reversal.channel_msisdn.as_str(),
            channel_pin: &reversal.channel_pin,
            amount: reversal.amount,
            transaction_id: &reversal.transaction_id,
            reference: &reversal.reference,
            purchase_reference: &reversal.purchase_reference,
        };
        tracing::debug!(reference = %reversal.reference, "sending reversal request");

        let response = self
            .http
            .post(format!("{}{}", self.base_url, REVERSE_PATH))
            .headers(biller_headers(&reversal.username, &reversal.password))
            .bearer_auth(&reversal.token)
            .json(&request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| ProviderError::transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::transport(e.to_string()))?;

        if !status.is_success() {
            return Err(error_from_body(status, &body));
        }

        match serde_json::from_str::<ReverseResponse>(&body) {
            Ok(resp) if resp.code == ResponseCode::ReverseSuccess.wire() => Ok(Reversal {
                description: resp.description.unwrap_or_default(),
                dm_reference: resp.dm_reference.unwrap_or_default(),
                reference: resp.reference.unwrap_or_default(),
                transaction_id: resp.transaction_id.unwrap_or_default(),
            }),
            _ => Err(error_from_body(status, &body)),
        }
    }
}

/// Credential headers the biller endpoints want on every request.
fn biller_headers(username: &str, password: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = username.parse() {
        headers.insert("Username", value);
    }
    if let Ok(value) = password.parse() {
        headers.insert("Password", value);
    }
    if let Ok(value) = "no-cache".parse() {
        headers.insert("Cache-Control", value);
    }
    headers
}

#[async_trait::async_trait]
impl ProviderApi for TigoPesaClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthToken, ProviderError> {
        TigoPesaClient::authenticate(self, credentials).await
    }

    async fn charge_customer(&self, charge: &ChargeCommand) -> Result<(), ProviderError> {
        TigoPesaClient::charge_customer(self, charge).await
    }

    async fn check_heartbeat(
        &self,
        credentials: &Credentials,
        reference: &str,
    ) -> Result<(), ProviderError> {
        TigoPesaClient::check_heartbeat(self, credentials, reference).await
    }

    async fn reverse_transaction(
        &self,
        reversal: &ReversalCommand,
    ) -> Result<Reversal, ProviderError> {
        TigoPesaClient::reverse_transaction(self, reversal).await
    }
}
