//! Job queue port.
//!
//! A façade over two independent durable queues: outbound charge requests
//! (consumed by the charge worker) and inbound charge results (produced by
//! the webhook confirmer, consumed by the host application). The queue
//! store is the sole owner of job state and provides at-least-once
//! delivery; retry policy lives with the consumer.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{ChargeRequest, ChargeResult, Job};
use crate::error::QueueError;

/// Port trait for the durable job queues.
#[async_trait::async_trait]
pub trait JobQueue: Send + Sync + 'static {
    /// Resolves once the queues can accept and deliver jobs.
    ///
    /// Consumers must not attach before this succeeds.
    async fn ready(&self) -> Result<(), QueueError>;

    /// Enqueues a charge request for the worker.
    async fn add_charge_request(
        &self,
        request: ChargeRequest,
    ) -> Result<Job<ChargeRequest>, QueueError>;

    /// Enqueues a charge result for the host application.
    async fn add_charge_result(&self, result: ChargeResult)
    -> Result<Job<ChargeResult>, QueueError>;

    /// Pops the next charge request, waiting up to `timeout`.
    ///
    /// Returns `None` on timeout or while the queue is paused.
    async fn next_charge_request(
        &self,
        timeout: Duration,
    ) -> Result<Option<Job<ChargeRequest>>, QueueError>;

    /// Pops the next charge result, waiting up to `timeout`.
    async fn next_charge_result(
        &self,
        timeout: Duration,
    ) -> Result<Option<Job<ChargeResult>>, QueueError>;

    /// Returns a failed job to the request queue for another delivery.
    ///
    /// The caller bumps `attempts` before requeueing.
    async fn requeue_charge_request(&self, job: Job<ChargeRequest>) -> Result<(), QueueError>;

    /// Pauses consumer intake without dropping queued jobs.
    ///
    /// Submissions are still accepted; `next_*` yields nothing until the
    /// process restarts. Draining is delegated to the queue store.
    async fn pause(&self);

    fn is_paused(&self) -> bool;
}

// A shared queue handle is still a queue.
#[async_trait::async_trait]
impl<Q: JobQueue> JobQueue for Arc<Q> {
    async fn ready(&self) -> Result<(), QueueError> {
        (**self).ready().await
    }

    async fn add_charge_request(
        &self,
        request: ChargeRequest,
    ) -> Result<Job<ChargeRequest>, QueueError> {
        (**self).add_charge_request(request).await
    }

    async fn add_charge_result(
        &self,
        result: ChargeResult,
    ) -> Result<Job<ChargeResult>, QueueError> {
        (**self).add_charge_result(result).await
    }

    async fn next_charge_request(
        &self,
        timeout: Duration,
    ) -> Result<Option<Job<ChargeRequest>>, QueueError> {
        (**self).next_charge_request(timeout).await
    }

    async fn next_charge_result(
        &self,
        timeout: Duration,
    ) -> Result<Option<Job<ChargeResult>>, QueueError> {
        (**self).next_charge_result(timeout).await
    }

    async fn requeue_charge_request(&self, job: Job<ChargeRequest>) -> Result<(), QueueError> {
        (**self).requeue_charge_request(job).await
    }

    async fn pause(&self) {
        (**self).pause().await
    }

    fn is_paused(&self) -> bool {
        (**self).is_paused()
    }
}
