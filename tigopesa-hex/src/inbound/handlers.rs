//! Webhook request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use tigopesa_types::{ChargeConfirmer, ChargeResult, ConfirmError, ResponseCode};

/// State shared across webhook handlers.
pub struct WebhookState<C: ChargeConfirmer> {
    pub confirmer: C,
    /// Prefix the worker added to outbound references
    pub biller_code: String,
}

/// Wrapper to implement IntoResponse for ConfirmError (orphan rule workaround).
///
/// Confirmer failures are not acknowledged to the provider; they surface as
/// a plain 500 so the provider redelivers.
pub struct ApiError(pub ConfirmError);

impl From<ConfirmError> for ApiError {
    fn from(err: ConfirmError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.0.to_string(),
            "code": StatusCode::INTERNAL_SERVER_ERROR.as_u16()
        });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// The provider's debit-mandate callback payload.
#[derive(Debug, Deserialize)]
pub struct DebitMandateCallback {
    #[serde(rename = "Status")]
    pub status: bool,
    #[serde(rename = "MFSTransactionID")]
    pub transaction_id: String,
    #[serde(rename = "ReferenceID")]
    pub reference: String,
    #[serde(rename = "Amount")]
    pub amount: i64,
}

/// Acknowledgment the provider expects back.
#[derive(Debug, Serialize)]
pub struct CallbackAck {
    #[serde(rename = "ResponseCode")]
    pub code: &'static str,
    #[serde(rename = "ResponseStatus")]
    pub status: bool,
    #[serde(rename = "ResponseDescription")]
    pub description: &'static str,
    #[serde(rename = "ReferenceID")]
    pub reference: String,
}

/// Handles the provider's asynchronous charge confirmation.
///
/// The confirmer is invoked exactly once per request and its boolean
/// strictly determines the acknowledgment variant. The inbound reference is
/// echoed back verbatim; the confirmer sees it with the biller-code prefix
/// stripped, restoring the caller's original correlation key.
#[tracing::instrument(skip(state, payload), fields(reference = %payload.reference))]
pub async fn debit_mandate<C: ChargeConfirmer>(
    State(state): State<Arc<WebhookState<C>>>,
    Json(payload): Json<DebitMandateCallback>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::debug!(
        status = payload.status,
        transaction_id = %payload.transaction_id,
        amount = payload.amount,
        "webhook call received"
    );

    let reference = payload
        .reference
        .strip_prefix(state.biller_code.as_str())
        .unwrap_or(&payload.reference)
        .to_string();

    let result = ChargeResult {
        status: payload.status,
        transaction_id: payload.transaction_id,
        reference,
        amount: payload.amount,
    };
    let ok = state.confirmer.confirm(result).await?;
    tracing::debug!(confirmed = ok, "callback result");

    let ack = if ok {
        CallbackAck {
            code: ResponseCode::CallbackSuccess.wire(),
            status: true,
            description: "Callback Successful",
            reference: payload.reference,
        }
    } else {
        CallbackAck {
            code: ResponseCode::CallbackFailed.wire(),
            status: false,
            description: "Callback failed",
            reference: payload.reference,
        }
    };
    Ok(Json(ack))
}
