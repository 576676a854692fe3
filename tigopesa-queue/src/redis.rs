//! Redis-backed queue adapter.
//!
//! Jobs live in two Redis lists, pushed with LPUSH and consumed with BRPOP
//! so each list behaves as a FIFO. A multiplexed [`ConnectionManager`]
//! handles reconnection; each operation clones it cheaply.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use ::redis::{AsyncCommands, aio::ConnectionManager};
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use tigopesa_types::{ChargeRequest, ChargeResult, Job, JobQueue, QueueError};

const REQUEST_QUEUE: &str = "payment:request";
const RESPONSE_QUEUE: &str = "payment:response";

pub struct RedisQueue {
    manager: ConnectionManager,
    paused: AtomicBool,
}

impl RedisQueue {
    /// Connects to the Redis store behind the queues.
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let client = ::redis::Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;
        Ok(Self {
            manager,
            paused: AtomicBool::new(false),
        })
    }

    async fn push<T: Serialize + Send + Sync>(
        &self,
        queue: &str,
        job: &Job<T>,
    ) -> Result<(), QueueError> {
        let payload = serde_json::to_string(job)?;
        let mut con = self.manager.clone();
        con.lpush::<_, _, ()>(queue, payload)
            .await
            .map_err(|e| QueueError::Connection(e.to_string()))?;
        Ok(())
    }

    async fn pop<T: DeserializeOwned>(
        &self,
        queue: &str,
        timeout: Duration,
    ) -> Result<Option<Job<T>>, QueueError> {
        if self.is_paused() {
            return Ok(None);
        }
        let mut con = self.manager.clone();
        let reply: Option<(String, String)> = con
            .brpop(queue, timeout.as_secs_f64())
            .await
            .map_err(|e| QueueError::Connection(e.to_string()))?;
        match reply {
            Some((_, payload)) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl JobQueue for RedisQueue {
    async fn ready(&self) -> Result<(), QueueError> {
        let mut con = self.manager.clone();
        let _: String = ::redis::cmd("PING")
            .query_async(&mut con)
            .await
            .map_err(|e| QueueError::Connection(e.to_string()))?;
        Ok(())
    }

    async fn add_charge_request(
        &self,
        request: ChargeRequest,
    ) -> Result<Job<ChargeRequest>, QueueError> {
        let job = Job::new(request);
        self.push(REQUEST_QUEUE, &job).await?;
        tracing::debug!(job_id = %job.id, reference = %job.data.reference, "charge request queued");
        Ok(job)
    }

    async fn add_charge_result(
        &self,
        result: ChargeResult,
    ) -> Result<Job<ChargeResult>, QueueError> {
        let job = Job::new(result);
        self.push(RESPONSE_QUEUE, &job).await?;
        tracing::debug!(job_id = %job.id, reference = %job.data.reference, "charge result queued");
        Ok(job)
    }

    async fn next_charge_request(
        &self,
        timeout: Duration,
    ) -> Result<Option<Job<ChargeRequest>>, QueueError> {
        self.pop(REQUEST_QUEUE, timeout).await
    }

    async fn next_charge_result(
        &self,
        timeout: Duration,
    ) -> Result<Option<Job<ChargeResult>>, QueueError> {
        self.pop(RESPONSE_QUEUE, timeout).await
    }

    async fn requeue_charge_request(&self, job: Job<ChargeRequest>) -> Result<(), QueueError> {
        self.push(REQUEST_QUEUE, &job).await
    }

    async fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
}
