//! Charge confirmation port.

use crate::domain::ChargeResult;
use crate::error::ConfirmError;

/// Host-supplied callback invoked by the webhook receiver, at most once per
/// inbound request.
///
/// The boolean strictly determines the acknowledgment sent back to the
/// provider: `true` confirms the transaction, `false` cancels it. Errors
/// are never swallowed by the receiver.
#[async_trait::async_trait]
pub trait ChargeConfirmer: Send + Sync + 'static {
    async fn confirm(&self, result: ChargeResult) -> Result<bool, ConfirmError>;
}
