//! In-memory queue adapter for tests and local development.
//!
//! Same semantics as the Redis adapter (FIFO, pause-aware blocking pop)
//! without durability.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{Instant, sleep};

use tigopesa_types::{ChargeRequest, ChargeResult, Job, JobQueue, QueueError};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Default)]
pub struct MemoryQueue {
    requests: Mutex<VecDeque<Job<ChargeRequest>>>,
    results: Mutex<VecDeque<Job<ChargeResult>>>,
    paused: AtomicBool,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    async fn pop<T>(
        &self,
        queue: &Mutex<VecDeque<Job<T>>>,
        timeout: Duration,
    ) -> Result<Option<Job<T>>, QueueError> {
        if self.is_paused() {
            return Ok(None);
        }
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(job) = queue.lock().expect("queue lock poisoned").pop_front() {
                return Ok(Some(job));
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            sleep(POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl JobQueue for MemoryQueue {
    async fn ready(&self) -> Result<(), QueueError> {
        Ok(())
    }

    async fn add_charge_request(
        &self,
        request: ChargeRequest,
    ) -> Result<Job<ChargeRequest>, QueueError> {
        let job = Job::new(request);
        self.requests
            .lock()
            .expect("queue lock poisoned")
            .push_back(job.clone());
        Ok(job)
    }

    async fn add_charge_result(
        &self,
        result: ChargeResult,
    ) -> Result<Job<ChargeResult>, QueueError> {
        let job = Job::new(result);
        self.results
            .lock()
            .expect("queue lock poisoned")
            .push_back(job.clone());
        Ok(job)
    }

    async fn next_charge_request(
        &self,
        timeout: Duration,
    ) -> Result<Option<Job<ChargeRequest>>, QueueError> {
        self.pop(&self.requests, timeout).await
    }

    async fn next_charge_result(
        &self,
        timeout: Duration,
    ) -> Result<Option<Job<ChargeResult>>, QueueError> {
        self.pop(&self.results, timeout).await
    }

    async fn requeue_charge_request(&self, job: Job<ChargeRequest>) -> Result<(), QueueError> {
        self.requests
            .lock()
            .expect("queue lock poisoned")
            .push_back(job);
        Ok(())
    }

    async fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tigopesa_types::Msisdn;

    fn request(reference: &str) -> ChargeRequest {
        ChargeRequest::new(Msisdn::new("255123456789").unwrap(), 1000, reference, None).unwrap()
    }

    #[tokio::test]
    async fn test_requests_are_fifo() {
        let queue = MemoryQueue::new();
        queue.add_charge_request(request("first")).await.unwrap();
        queue.add_charge_request(request("second")).await.unwrap();

        let job = queue
            .next_charge_request(Duration::from_millis(10))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(job.data.reference, "first");

        let job = queue
            .next_charge_request(Duration::from_millis(10))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(job.data.reference, "second");
    }

    #[tokio::test]
    async fn test_empty_queue_times_out() {
        let queue = MemoryQueue::new();
        let job = queue
            .next_charge_request(Duration::from_millis(10))
            .await
            .unwrap();
        assert!(job.is_none());
    }

    #[tokio::test]
    async fn test_pause_stops_intake_but_keeps_jobs() {
        let queue = MemoryQueue::new();
        queue.add_charge_request(request("kept")).await.unwrap();
        queue.pause().await;

        assert!(queue.is_paused());
        let job = queue
            .next_charge_request(Duration::from_millis(10))
            .await
            .unwrap();
        assert!(job.is_none());

        // Submission still works while paused.
        queue.add_charge_request(request("also kept")).await.unwrap();
        assert_eq!(queue.requests.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_requeue_preserves_attempts() {
        let queue = MemoryQueue::new();
        queue.add_charge_request(request("retry me")).await.unwrap();

        let mut job = queue
            .next_charge_request(Duration::from_millis(10))
            .await
            .unwrap()
            .unwrap();
        job.attempts += 1;
        queue.requeue_charge_request(job).await.unwrap();

        let job = queue
            .next_charge_request(Duration::from_millis(10))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(job.attempts, 1);
        assert_eq!(job.data.reference, "retry me");
    }

    #[tokio::test]
    async fn test_result_queue_round_trip() {
        let queue = MemoryQueue::new();
        let result = ChargeResult {
            status: true,
            transaction_id: "tx-1".into(),
            reference: "ref-1".into(),
            amount: 1000,
        };
        queue.add_charge_result(result.clone()).await.unwrap();

        let job = queue
            .next_charge_result(Duration::from_millis(10))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(job.data, result);
    }
}
