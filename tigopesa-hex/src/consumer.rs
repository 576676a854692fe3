//! Queue consumer loop.
//!
//! Attaches the charge worker to the request queue: pop, process, and on
//! failure hand the job back for another delivery. A single job failure
//! never takes the loop down.

use std::time::Duration;

use tigopesa_types::{ChargeRequest, Job, JobQueue, ProviderApi};
use tracing::{error, info, instrument, warn};

use crate::worker::ChargeWorker;

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(1);

pub struct ChargeConsumer<P: ProviderApi, Q: JobQueue> {
    worker: ChargeWorker<P>,
    queue: Q,
    max_attempts: u32,
    poll_timeout: Duration,
}

impl<P: ProviderApi, Q: JobQueue> ChargeConsumer<P, Q> {
    pub fn new(worker: ChargeWorker<P>, queue: Q) -> Self {
        Self {
            worker,
            queue,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
        }
    }

    /// Overrides the delivery policy.
    pub fn with_policy(mut self, max_attempts: u32, poll_timeout: Duration) -> Self {
        self.max_attempts = max_attempts;
        self.poll_timeout = poll_timeout;
        self
    }

    /// Runs the consumer until the queue is paused.
    ///
    /// Waits for queue readiness before attaching; a queue that never comes
    /// up means no consumer, matching the readiness contract.
    #[instrument(skip(self))]
    pub async fn run(self) {
        if let Err(e) = self.queue.ready().await {
            error!("queue not ready, consumer not attached: {e}");
            return;
        }
        info!("charge consumer attached");

        while !self.queue.is_paused() {
            let job = match self.queue.next_charge_request(self.poll_timeout).await {
                Ok(Some(job)) => job,
                Ok(None) => continue,
                Err(e) => {
                    error!("failed to fetch charge job: {e}");
                    tokio::time::sleep(self.poll_timeout).await;
                    continue;
                }
            };
            self.process_job(job).await;
        }
        info!("charge consumer stopped");
    }

    /// Processes one delivery, requeueing on failure until the job runs out
    /// of attempts.
    #[instrument(skip(self, job), fields(job_id = %job.id, attempt = job.attempts + 1))]
    async fn process_job(&self, mut job: Job<ChargeRequest>) {
        match self.worker.process(&job).await {
            Ok(result) => {
                info!(result, "charge job processed");
            }
            Err(error) => {
                job.attempts += 1;
                if job.attempts < self.max_attempts {
                    warn!(attempts = job.attempts, "requeueing failed charge job");
                    if let Err(e) = self.queue.requeue_charge_request(job).await {
                        error!("failed to requeue charge job: {e}");
                    }
                } else {
                    error!(
                        attempts = job.attempts,
                        %error,
                        "dropping charge job, out of attempts"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::MerchantConfig;
    use crate::worker_tests::tests::{FlakyProvider, merchant};
    use std::sync::Arc;
    use tigopesa_queue::MemoryQueue;
    use tigopesa_types::{ChargeRequest, Msisdn};

    fn request(reference: &str) -> ChargeRequest {
        ChargeRequest::new(Msisdn::new("255123456789").unwrap(), 5000, reference, None).unwrap()
    }

    async fn run_consumer<P: ProviderApi>(
        api: P,
        merchant: MerchantConfig,
        queue: Arc<MemoryQueue>,
        max_attempts: u32,
    ) {
        let consumer = ChargeConsumer::new(ChargeWorker::new(api, merchant), queue.clone())
            .with_policy(max_attempts, Duration::from_millis(10));
        let handle = tokio::spawn(consumer.run());

        // Let the consumer drain the queue, then stop it.
        tokio::time::sleep(Duration::from_millis(200)).await;
        queue.pause().await;
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_job_is_requeued_until_out_of_attempts() {
        let api = FlakyProvider::failing_charges();
        let calls = api.charge_calls.clone();
        let queue = Arc::new(MemoryQueue::new());
        queue.add_charge_request(request("ref-1")).await.unwrap();

        run_consumer(api, merchant(), queue.clone(), 3).await;

        // Initial delivery plus two redeliveries.
        assert_eq!(calls.lock().unwrap().len(), 3);
        assert!(
            queue
                .next_charge_request(Duration::from_millis(10))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_one_bad_job_does_not_stop_the_loop() {
        let api = FlakyProvider::failing_reference("poison");
        let calls = api.charge_calls.clone();
        let queue = Arc::new(MemoryQueue::new());
        queue.add_charge_request(request("poison")).await.unwrap();
        queue.add_charge_request(request("good")).await.unwrap();

        run_consumer(api, merchant(), queue.clone(), 2).await;

        let calls = calls.lock().unwrap();
        assert!(calls.iter().any(|r| r.ends_with("good")));
        // The poison job was retried and dropped, the good one processed once.
        assert_eq!(calls.iter().filter(|r| r.ends_with("poison")).count(), 2);
    }
}
