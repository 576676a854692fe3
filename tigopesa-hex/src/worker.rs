//! Charge worker.
//!
//! Processes one queued charge request at a time: authenticate, then
//! submit. Contains NO queue logic - retry and delivery belong to the
//! consumer and the queue store.

use tigopesa_types::{
    ChargeCommand, ChargeRequest, Credentials, Job, Msisdn, ProviderApi, ProviderError,
};

/// Job result recorded for a fully processed charge request.
///
/// Means the provider accepted the request for processing; settlement is
/// confirmed later through the webhook.
pub const JOB_SUCCESS: &str = "Success";

/// Merchant-side configuration the worker needs for every charge.
#[derive(Debug, Clone)]
pub struct MerchantConfig {
    pub username: String,
    pub password: String,
    /// The merchant's biller MSISDN
    pub biller_msisdn: Msisdn,
    /// Prefix added to every reference sent to the provider
    pub biller_code: String,
}

/// Application service for charge jobs.
///
/// Generic over `P: ProviderApi` - the adapter is injected at compile time,
/// so tests can drive the worker against an in-memory provider.
pub struct ChargeWorker<P: ProviderApi> {
    api: P,
    merchant: MerchantConfig,
}

impl<P: ProviderApi> ChargeWorker<P> {
    pub fn new(api: P, merchant: MerchantConfig) -> Self {
        Self { api, merchant }
    }

    /// Processes a single charge job.
    ///
    /// Each invocation authenticates from scratch - tokens are never shared
    /// across jobs. Failures are logged with full job context and returned
    /// untouched so the queue's retry policy stays in charge.
    #[tracing::instrument(skip(self, job), fields(job_id = %job.id, reference = %job.data.reference))]
    pub async fn process(&self, job: &Job<ChargeRequest>) -> Result<&'static str, ProviderError> {
        let request = &job.data;

        let credentials = Credentials::new(&self.merchant.username, &self.merchant.password);
        let auth = self
            .api
            .authenticate(&credentials)
            .await
            .map_err(|e| self.fail(request, e))?;

        let charge = ChargeCommand {
            token: auth.token,
            username: self.merchant.username.clone(),
            password: self.merchant.password.clone(),
            msisdn: request.msisdn.clone(),
            biller_msisdn: self.merchant.biller_msisdn.clone(),
            amount: request.amount,
            // The provider wants references prefixed with the biller code;
            // the webhook receiver strips it again on the way back.
            reference: format!("{}{}", self.merchant.biller_code, request.reference),
            remarks: request.remarks.clone(),
        };
        self.api
            .charge_customer(&charge)
            .await
            .map_err(|e| self.fail(request, e))?;

        Ok(JOB_SUCCESS)
    }

    fn fail(&self, request: &ChargeRequest, error: ProviderError) -> ProviderError {
        tracing::error!(
            msisdn = %request.msisdn,
            amount = request.amount,
            reference = %request.reference,
            code = %error.code(),
            %error,
            "failed to process charge job"
        );
        error
    }
}
