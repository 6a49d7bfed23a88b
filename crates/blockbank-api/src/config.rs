//! Block Bank API configuration

use anyhow::Result;
use blockbank_chain::SimulatorConfig;
use blockbank_common::BlockBankError;
use serde::{Deserialize, Serialize};

/// API service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Service host
    pub host: String,
    /// Service port
    pub port: u16,
    /// How long issued quotes stay valid
    pub quote_validity_ms: u64,
    /// Simulated chain settings
    pub chain: SimulatorConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            quote_validity_ms: blockbank_pricing::LoanQuote::DEFAULT_VALIDITY_MS,
            chain: SimulatorConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from `.env` and the environment
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let cfg = Self::from_lookup(|key| std::env::var(key).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build from an arbitrary variable source; unparseable values keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        // Platform-assigned PORT first, BLOCKBANK_PORT overrides it
        if let Some(p) = lookup("PORT").and_then(|v| v.parse().ok()) {
            cfg.port = p;
        }
        if let Some(host) = lookup("BLOCKBANK_HOST") {
            cfg.host = host;
        }
        if let Some(p) = lookup("BLOCKBANK_PORT").and_then(|v| v.parse().ok()) {
            cfg.port = p;
        }
        if let Some(v) = lookup("BLOCKBANK_QUOTE_VALIDITY_MS").and_then(|v| v.parse().ok()) {
            cfg.quote_validity_ms = v;
        }

        // Chain simulator
        if let Some(v) = lookup("BLOCKBANK_CHAIN_MIN_LATENCY_MS").and_then(|v| v.parse().ok()) {
            cfg.chain.min_latency_ms = v;
        }
        if let Some(v) = lookup("BLOCKBANK_CHAIN_MAX_LATENCY_MS").and_then(|v| v.parse().ok()) {
            cfg.chain.max_latency_ms = v;
        }
        if let Some(v) = lookup("BLOCKBANK_CHAIN_FAILURE_RATE").and_then(|v| v.parse().ok()) {
            cfg.chain.failure_rate = v;
        }
        if let Some(v) = lookup("BLOCKBANK_CHAIN_DEADLINE_MS").and_then(|v| v.parse().ok()) {
            cfg.chain.deadline_ms = v;
        }

        cfg
    }

    pub fn validate(&self) -> std::result::Result<(), BlockBankError> {
        let max = blockbank_pricing::LoanQuote::MAX_VALIDITY_MS;
        if self.quote_validity_ms == 0 || self.quote_validity_ms > max {
            return Err(BlockBankError::Config(format!(
                "quote validity {}ms outside 1..={}ms",
                self.quote_validity_ms, max
            )));
        }
        self.chain
            .validate()
            .map_err(|e| BlockBankError::Config(format!("chain simulator: {}", e)))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
