//! # TigoPesa Queue
//!
//! Concrete queue adapters for the TigoPesa gateway. This crate implements
//! the [`JobQueue`] port over two independent durable queues: outbound
//! charge requests and inbound charge results. The queue store owns job
//! state and delivery; retry policy lives with the consumer.

#[cfg(not(any(feature = "redis", feature = "memory")))]
compile_error!("Enable a queue feature: `redis` or `memory`.");

use std::time::Duration;

use async_trait::async_trait;
use tigopesa_types::{ChargeRequest, ChargeResult, Job, JobQueue, QueueError};

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;

#[cfg(feature = "memory")]
pub use memory::MemoryQueue;
#[cfg(feature = "redis")]
pub use redis::RedisQueue;

/// Unified queue wrapper over the feature-selected backend.
pub struct Queue {
    #[cfg(all(feature = "memory", not(feature = "redis")))]
    inner: memory::MemoryQueue,
    #[cfg(feature = "redis")]
    inner: redis::RedisQueue,
}

/// Build and connect a queue from a store URL.
///
/// # Examples
///
/// ```ignore
/// // Redis (with `redis` feature)
/// let queue = build_queue("redis://127.0.0.1:6379").await?;
/// ```
pub async fn build_queue(queue_url: &str) -> anyhow::Result<Queue> {
    Queue::new(queue_url).await
}

impl Queue {
    #[cfg(all(feature = "memory", not(feature = "redis")))]
    pub async fn new(_queue_url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            inner: memory::MemoryQueue::new(),
        })
    }

    #[cfg(feature = "redis")]
    pub async fn new(queue_url: &str) -> anyhow::Result<Self> {
        let inner = redis::RedisQueue::connect(queue_url).await?;
        Ok(Self { inner })
    }
}

#[async_trait]
impl JobQueue for Queue {
    async fn ready(&self) -> Result<(), QueueError> {
        self.inner.ready().await
    }

    async fn add_charge_request(
        &self,
        request: ChargeRequest,
    ) -> Result<Job<ChargeRequest>, QueueError> {
        self.inner.add_charge_request(request).await
    }

    async fn add_charge_result(
        &self,
        result: ChargeResult,
    ) -> Result<Job<ChargeResult>, QueueError> {
        self.inner.add_charge_result(result).await
    }

    async fn next_charge_request(
        &self,
        timeout: Duration,
    ) -> Result<Option<Job<ChargeRequest>>, QueueError> {
        self.inner.next_charge_request(timeout).await
    }

    async fn next_charge_result(
        &self,
        timeout: Duration,
    ) -> Result<Option<Job<ChargeResult>>, QueueError> {
        self.inner.next_charge_result(timeout).await
    }

    async fn requeue_charge_request(&self, job: Job<ChargeRequest>) -> Result<(), QueueError> {
        self.inner.requeue_charge_request(job).await
    }

    async fn pause(&self) {
        self.inner.pause().await
    }

    fn is_paused(&self) -> bool {
        self.inner.is_paused()
    }
}
