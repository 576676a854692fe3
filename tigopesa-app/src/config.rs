//! Configuration loading from environment.

use std::env;

use tigopesa_types::Msisdn;

/// Application configuration.
///
/// Loaded once at startup; components receive only the values they need.
pub struct Config {
    pub port: u16,
    pub api_url: String,
    pub username: String,
    pub password: String,
    pub biller_msisdn: Msisdn,
    pub biller_code: String,
    pub redis_url: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;

        let api_url = require("TIGOPESA_API_URL")?;
        let username = require("TIGOPESA_MERCHANT_USERNAME")?;
        let password = require("TIGOPESA_MERCHANT_PASSWORD")?;
        let biller_msisdn: Msisdn = require("TIGOPESA_BILLER_NUMBER")?.parse()?;
        let biller_code = require("TIGOPESA_BILLER_CODE")?;

        let redis_url =
            env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());

        Ok(Self {
            port,
            api_url,
            username,
            password,
            biller_msisdn,
            biller_code,
            redis_url,
        })
    }
}

fn require(name: &str) -> anyhow::Result<String> {
    env::var(name).map_err(|_| anyhow::anyhow!("{name} environment variable is required"))
}
