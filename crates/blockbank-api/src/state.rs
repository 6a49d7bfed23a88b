//! Shared handler state

use std::sync::Arc;

use blockbank_chain::{ChainClient, LoanService, SimulatedChain, TransactionService};
use blockbank_common::BlockBankError;
use blockbank_pricing::QuoteEngine;

use crate::config::ApiConfig;

/// State handed to every handler through axum's `State` extractor
#[derive(Clone)]
pub struct AppState {
    pub engine: QuoteEngine,
    pub loans: LoanService,
    pub transactions: TransactionService,
}

impl AppState {
    pub fn new(engine: QuoteEngine, chain: Arc<dyn ChainClient>) -> Self {
        Self {
            engine,
            loans: LoanService::new(chain.clone()),
            transactions: TransactionService::new(chain),
        }
    }

    /// Wire up a simulated chain from configuration
    pub fn from_config(config: &ApiConfig) -> Result<Self, BlockBankError> {
        let engine = QuoteEngine::new().with_validity_ms(config.quote_validity_ms);
        let chain: Arc<dyn ChainClient> = Arc::new(SimulatedChain::new(config.chain.clone())?);
        Ok(Self::new(engine, chain))
    }
}
