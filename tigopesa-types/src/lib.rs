//! # TigoPesa Types
//!
//! Domain types and port traits for the TigoPesa merchant gateway.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (Msisdn, ChargeRequest, ResponseCode, Job)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Request objects crossing the provider API boundary
//! - `error/` - Provider, queue and confirmation error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{AuthToken, ChargeRequest, ChargeResult, Job, Msisdn, ResponseCode, Reversal};
pub use dto::{ChargeCommand, Credentials, ReversalCommand};
pub use error::{ConfirmError, DomainError, ProviderError, QueueError};
pub use ports::{ChargeConfirmer, JobQueue, ProviderApi};
