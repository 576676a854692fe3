//! HTTP Inbound Adapter
//!
//! Axum-based server receiving the provider's asynchronous webhook
//! callbacks.

mod confirm;
mod handlers;
mod server;

pub use confirm::QueueConfirmer;
pub use server::WebhookServer;
