//! Provider API port.
//!
//! Implementations talk to the TigoPesa HTTP endpoints; tests substitute
//! in-memory fakes.

use crate::domain::{AuthToken, Reversal};
use crate::dto::{ChargeCommand, Credentials, ReversalCommand};
use crate::error::ProviderError;

/// Port trait for the TigoPesa remote operations.
#[async_trait::async_trait]
pub trait ProviderApi: Send + Sync + 'static {
    /// Obtains a fresh access token for the given merchant credentials.
    ///
    /// No caching: callers fetch a token per charge attempt.
    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthToken, ProviderError>;

    /// Submits a customer charge.
    ///
    /// Succeeds only when the provider answers with the catalog SUCCESS
    /// code; acceptance for processing, not settlement.
    async fn charge_customer(&self, charge: &ChargeCommand) -> Result<(), ProviderError>;

    /// Liveness probe against the provider.
    ///
    /// Fails with an invalid-response error when the echoed reference does
    /// not exactly equal the one sent.
    async fn check_heartbeat(
        &self,
        credentials: &Credentials,
        reference: &str,
    ) -> Result<(), ProviderError>;

    /// Reverses a previously settled charge.
    async fn reverse_transaction(
        &self,
        reversal: &ReversalCommand,
    ) -> Result<Reversal, ProviderError>;
}
