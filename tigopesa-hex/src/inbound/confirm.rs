//! Queue-backed confirmation callback.

use async_trait::async_trait;

use tigopesa_types::{ChargeConfirmer, ChargeResult, ConfirmError, JobQueue};

/// Confirms every charge result by handing it to the host application via
/// the result queue.
///
/// Queue failures propagate: a result that cannot be recorded must not be
/// acknowledged to the provider.
pub struct QueueConfirmer<Q: JobQueue> {
    queue: Q,
}

impl<Q: JobQueue> QueueConfirmer<Q> {
    pub fn new(queue: Q) -> Self {
        Self { queue }
    }
}

#[async_trait]
impl<Q: JobQueue> ChargeConfirmer for QueueConfirmer<Q> {
    async fn confirm(&self, result: ChargeResult) -> Result<bool, ConfirmError> {
        let job = self.queue.add_charge_result(result).await?;
        tracing::debug!(job_id = %job.id, reference = %job.data.reference, "charge result recorded");
        Ok(true)
    }
}
