//! TigoPesa CLI
//!
//! Operator command-line interface for the TigoPesa gateway.

use anyhow::Result;
use clap::{Parser, Subcommand};

use tigopesa_client::TigoPesaClient;
use tigopesa_queue::build_queue;
use tigopesa_types::{ChargeRequest, Credentials, JobQueue, Msisdn, ReversalCommand};

#[derive(Parser)]
#[command(name = "tigopesa")]
#[command(author, version, about = "TigoPesa gateway operator CLI", long_about = None)]
struct Cli {
    /// Base URL of the TigoPesa API
    #[arg(long, env = "TIGOPESA_API_URL")]
    api_url: String,

    /// Merchant username
    #[arg(long, env = "TIGOPESA_MERCHANT_USERNAME")]
    username: String,

    /// Merchant password
    #[arg(long, env = "TIGOPESA_MERCHANT_PASSWORD")]
    password: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe the provider's heartbeat endpoint
    Heartbeat {
        /// Reference the provider must echo back
        #[arg(long)]
        reference: String,
    },
    /// Queue a customer charge request
    Charge {
        /// Customer MSISDN (255 followed by nine digits)
        #[arg(long)]
        msisdn: String,
        /// Amount in TZS
        #[arg(long)]
        amount: i64,
        /// Unique correlation reference
        #[arg(long)]
        reference: String,
        #[arg(long)]
        remarks: Option<String>,
        /// Queue store URL
        #[arg(long, env = "REDIS_URL", default_value = "redis://127.0.0.1:6379")]
        redis_url: String,
    },
    /// Reverse a settled transaction
    Reverse {
        /// Customer MSISDN of the original charge
        #[arg(long)]
        msisdn: String,
        /// The merchant's channel MSISDN
        #[arg(long, env = "TIGOPESA_BILLER_NUMBER")]
        channel_msisdn: String,
        /// Channel PIN
        #[arg(long, env = "TIGOPESA_CHANNEL_PIN")]
        pin: String,
        /// Amount in TZS
        #[arg(long)]
        amount: i64,
        /// Provider transaction ID of the charge being reversed
        #[arg(long)]
        transaction_id: String,
        /// Correlation reference for the reversal
        #[arg(long)]
        reference: String,
        /// Reference of the original purchase
        #[arg(long)]
        purchase_reference: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let client = TigoPesaClient::new(&cli.api_url);
    let credentials = Credentials::new(&cli.username, &cli.password);

    match cli.command {
        Commands::Heartbeat { reference } => {
            client.check_heartbeat(&credentials, &reference).await?;
            println!("Heartbeat OK, reference echoed back");
        }
        Commands::Charge {
            msisdn,
            amount,
            reference,
            remarks,
            redis_url,
        } => {
            let request = ChargeRequest::new(msisdn.parse::<Msisdn>()?, amount, reference, remarks)?;
            let queue = build_queue(&redis_url).await?;
            let job = queue.add_charge_request(request).await?;
            println!("{}", serde_json::to_string_pretty(&job)?);
        }
        Commands::Reverse {
            msisdn,
            channel_msisdn,
            pin,
            amount,
            transaction_id,
            reference,
            purchase_reference,
        } => {
            let auth = client.authenticate(&credentials).await?;
            let reversal = client
                .reverse_transaction(&ReversalCommand {
                    token: auth.token,
                    username: cli.username.clone(),
                    password: cli.password.clone(),
                    msisdn: msisdn.parse::<Msisdn>()?,
                    channel_msisdn: channel_msisdn.parse::<Msisdn>()?,
                    channel_pin: pin,
                    amount,
                    transaction_id,
                    reference,
                    purchase_reference,
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&reversal)?);
        }
    }

    Ok(())
}
