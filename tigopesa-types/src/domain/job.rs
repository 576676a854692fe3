//! Queue job envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope the queue adapter wraps around a payload.
///
/// The queue store is the sole owner of job state; this type only travels
/// through it. `attempts` counts deliveries that have already failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job<T> {
    pub id: Uuid,
    pub attempts: u32,
    pub created_at: DateTime<Utc>,
    pub data: T,
}

impl<T> Job<T> {
    pub fn new(data: T) -> Self {
        Self {
            id: Uuid::new_v4(),
            attempts: 0,
            created_at: Utc::now(),
            data,
        }
    }
}
