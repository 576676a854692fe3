//! # TigoPesa Gateway
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Connect the job queue
//! - Create the provider client and charge worker
//! - Attach the queue consumer and start the webhook server

mod config;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tigopesa_client::TigoPesaClient;
use tigopesa_hex::{
    ChargeConsumer, ChargeWorker, MerchantConfig,
    inbound::{QueueConfirmer, WebhookServer},
};
use tigopesa_queue::build_queue;
use tigopesa_types::JobQueue;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tigopesa_app=debug,tigopesa_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::Config::from_env()?;

    tracing::info!("Starting TigoPesa gateway on port {}", config.port);
    tracing::info!("Using queue store: {}", config.redis_url);

    // Connect the durable queues
    let queue = Arc::new(build_queue(&config.redis_url).await?);

    // Create the provider client and the charge worker
    let api = TigoPesaClient::new(&config.api_url);
    let worker = ChargeWorker::new(
        api,
        MerchantConfig {
            username: config.username,
            password: config.password,
            biller_msisdn: config.biller_msisdn,
            biller_code: config.biller_code.clone(),
        },
    );

    // Attach the queue consumer
    let consumer = ChargeConsumer::new(worker, queue.clone());
    let consumer_handle = tokio::spawn(consumer.run());

    // Run the webhook server until shutdown
    let server = WebhookServer::new(QueueConfirmer::new(queue.clone()), config.biller_code);
    let addr = format!("0.0.0.0:{}", config.port);
    server.run(&addr).await?;

    // Stop intake; queued jobs stay in the store for the next start.
    queue.pause().await;
    consumer_handle.await?;

    Ok(())
}
