//! Chain client
//!
//! [`ChainClient`] is the async boundary between Block Bank and the chain.
//! [`SimulatedChain`] settles transactions locally: it waits a random
//! latency, succeeds or fails at a configured rate, and keeps every settled
//! receipt so it can be looked up later.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use blockbank_common::{BlockBankError, ChainError};
use dashmap::DashMap;
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::types::{TxReceipt, TxRequest, TxStatus};

/// First block number handed out by the simulator
pub const GENESIS_BLOCK: u64 = 18_000_000;

const FAILURE_REASONS: [&str; 4] = [
    "execution reverted",
    "out of gas",
    "nonce too low",
    "replacement transaction underpriced",
];

/// Access to a chain
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Submit and wait for settlement, giving up after `deadline`
    ///
    /// A transaction that settles as failed is still `Ok`; its receipt
    /// carries [`TxStatus::Failed`].
    async fn submit_with_deadline(&self, request: TxRequest, deadline: Duration) -> Result<TxReceipt, ChainError>;

    /// Deadline used by [`ChainClient::submit`]
    fn default_deadline(&self) -> Duration;

    /// Submit with the default deadline
    async fn submit(&self, request: TxRequest) -> Result<TxReceipt, ChainError> {
        let deadline = self.default_deadline();
        self.submit_with_deadline(request, deadline).await
    }

    /// Look up a settled transaction
    async fn receipt(&self, tx_hash: &str) -> Option<TxReceipt>;

    /// Settled transactions sent from `address`, oldest first
    async fn history(&self, address: &str) -> Vec<TxReceipt>;
}

/// Simulator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    pub min_latency_ms: u64,
    pub max_latency_ms: u64,
    /// Probability (0.0 - 1.0) that a transaction settles as failed
    pub failure_rate: f64,
    pub deadline_ms: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            min_latency_ms: 500,
            max_latency_ms: 2_000,
            failure_rate: 0.05,
            deadline_ms: 10_000,
        }
    }
}

impl SimulatorConfig {
    /// Settles immediately and never fails
    pub fn instant() -> Self {
        Self {
            min_latency_ms: 0,
            max_latency_ms: 0,
            failure_rate: 0.0,
            deadline_ms: 1_000,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.min_latency_ms > self.max_latency_ms {
            return Err(format!(
                "min latency {}ms exceeds max latency {}ms",
                self.min_latency_ms, self.max_latency_ms
            ));
        }
        // NaN fails the range check too
        if !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(format!("failure rate {} outside 0.0..=1.0", self.failure_rate));
        }
        if self.deadline_ms == 0 {
            return Err("deadline must be positive".to_string());
        }
        Ok(())
    }
}

/// Outcome drawn before the simulated wait
struct Draw {
    latency: Duration,
    failure: Option<&'static str>,
    nonce: [u8; 32],
}

/// Local chain simulator
///
/// Receipts are kept in memory for the life of the simulator. There is no
/// eviction, so a long-running process grows with every submission.
pub struct SimulatedChain {
    config: SimulatorConfig,
    receipts: DashMap<String, TxReceipt>,
    next_block: AtomicU64,
}

impl SimulatedChain {
    /// Create a simulator, rejecting settings that cannot be sampled
    pub fn new(config: SimulatorConfig) -> Result<Self, BlockBankError> {
        config
            .validate()
            .map_err(|e| BlockBankError::Config(format!("chain simulator: {}", e)))?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: SimulatorConfig) -> Self {
        Self {
            config,
            receipts: DashMap::new(),
            next_block: AtomicU64::new(GENESIS_BLOCK),
        }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Number of settled transactions
    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }

    fn draw(&self) -> Draw {
        let mut rng = rand::thread_rng();
        let latency_ms = rng.gen_range(self.config.min_latency_ms..=self.config.max_latency_ms);
        let failure = if rng.gen_bool(self.config.failure_rate) {
            Some(FAILURE_REASONS[rng.gen_range(0..FAILURE_REASONS.len())])
        } else {
            None
        };
        let mut nonce = [0u8; 32];
        rng.fill(&mut nonce);

        Draw {
            latency: Duration::from_millis(latency_ms),
            failure,
            nonce,
        }
    }

    async fn settle(&self, request: TxRequest) -> TxReceipt {
        let submitted_at = chrono::Utc::now().timestamp_millis();
        let draw = self.draw();
        let tx_hash = tx_hash(&draw.nonce, &request);

        debug!(%tx_hash, kind = request.kind.as_str(), latency_ms = draw.latency.as_millis() as u64, "Waiting for settlement");
        tokio::time::sleep(draw.latency).await;

        let (status, block_number) = match draw.failure {
            Some(reason) => (
                TxStatus::Failed {
                    reason: reason.to_string(),
                },
                None,
            ),
            None => (TxStatus::Confirmed, Some(self.next_block.fetch_add(1, Ordering::Relaxed))),
        };

        TxReceipt {
            tx_hash,
            kind: request.kind,
            from: request.from,
            amount: request.amount,
            reference: request.reference,
            status,
            block_number,
            submitted_at,
            settled_at: chrono::Utc::now().timestamp_millis(),
            latency_ms: draw.latency.as_millis() as u64,
        }
    }
}

impl Default for SimulatedChain {
    fn default() -> Self {
        Self::with_valid_config(SimulatorConfig::default())
    }
}

#[async_trait]
impl ChainClient for SimulatedChain {
    async fn submit_with_deadline(&self, request: TxRequest, deadline: Duration) -> Result<TxReceipt, ChainError> {
        validate_request(&request)?;

        let receipt = tokio::time::timeout(deadline, self.settle(request))
            .await
            .map_err(|_| {
                warn!(limit_ms = deadline.as_millis() as u64, "Transaction settlement timed out");
                ChainError::DeadlineExceeded {
                    limit_ms: deadline.as_millis() as u64,
                }
            })?;

        match &receipt.status {
            TxStatus::Confirmed => info!(
                tx_hash = %receipt.tx_hash,
                kind = receipt.kind.as_str(),
                block = receipt.block_number,
                "Transaction confirmed"
            ),
            TxStatus::Failed { reason } => warn!(
                tx_hash = %receipt.tx_hash,
                kind = receipt.kind.as_str(),
                reason = %reason,
                "Transaction failed"
            ),
        }

        self.receipts.insert(receipt.tx_hash.clone(), receipt.clone());
        Ok(receipt)
    }

    fn default_deadline(&self) -> Duration {
        Duration::from_millis(self.config.deadline_ms)
    }

    async fn receipt(&self, tx_hash: &str) -> Option<TxReceipt> {
        self.receipts.get(tx_hash).map(|r| r.value().clone())
    }

    async fn history(&self, address: &str) -> Vec<TxReceipt> {
        let mut receipts: Vec<TxReceipt> = self
            .receipts
            .iter()
            .filter(|r| r.from == address)
            .map(|r| r.value().clone())
            .collect();
        receipts.sort_by_key(|r| (r.submitted_at, r.block_number));
        receipts
    }
}

fn validate_request(request: &TxRequest) -> Result<(), ChainError> {
    if request.from.trim().is_empty() {
        return Err(ChainError::InvalidAddress(request.from.clone()));
    }
    if request.amount <= Decimal::ZERO {
        return Err(ChainError::InvalidAmount(request.amount.to_string()));
    }
    Ok(())
}

/// `0x`-prefixed blake3 digest of a random nonce and the request
fn tx_hash(nonce: &[u8; 32], request: &TxRequest) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(nonce);
    hasher.update(request.kind.as_str().as_bytes());
    hasher.update(request.from.as_bytes());
    hasher.update(request.amount.to_string().as_bytes());
    if let Some(reference) = &request.reference {
        hasher.update(reference.as_bytes());
    }
    format!("0x{}", hex::encode(hasher.finalize().as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TxKind;
    use rust_decimal_macros::dec;

    fn loan(amount: Decimal) -> TxRequest {
        TxRequest::new(TxKind::LoanOrigination, "0xborrower", amount).with_reference("loan-1")
    }

    #[tokio::test]
    async fn test_instant_confirmation() {
        let chain = SimulatedChain::new(SimulatorConfig::instant()).unwrap();
        let receipt = chain.submit(loan(dec!(1500))).await.unwrap();

        assert!(receipt.status.is_confirmed());
        assert_eq!(receipt.block_number, Some(GENESIS_BLOCK));
        assert!(receipt.settled_at >= receipt.submitted_at);
        assert_eq!(receipt.tx_hash.len(), 66);
        assert!(receipt.tx_hash.starts_with("0x"));
        assert!(receipt.tx_hash[2..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(chain.len(), 1);
    }

    #[tokio::test]
    async fn test_block_numbers_increase() {
        let chain = SimulatedChain::new(SimulatorConfig::instant()).unwrap();
        let first = chain.submit(loan(dec!(1))).await.unwrap();
        let second = chain.submit(loan(dec!(2))).await.unwrap();
        assert!(second.block_number > first.block_number);
        assert_ne!(first.tx_hash, second.tx_hash);
    }

    #[tokio::test]
    async fn test_certain_failure() {
        let config = SimulatorConfig {
            failure_rate: 1.0,
            ..SimulatorConfig::instant()
        };
        let chain = SimulatedChain::new(config).unwrap();
        let receipt = chain.submit(loan(dec!(10))).await.unwrap();

        assert!(matches!(receipt.status, TxStatus::Failed { .. }));
        assert_eq!(receipt.block_number, None);
        // Failed transactions are still recorded
        assert!(chain.receipt(&receipt.tx_hash).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_exceeded() {
        let config = SimulatorConfig {
            min_latency_ms: 5_000,
            max_latency_ms: 5_000,
            failure_rate: 0.0,
            deadline_ms: 10_000,
        };
        let chain = SimulatedChain::new(config).unwrap();
        let err = chain
            .submit_with_deadline(loan(dec!(10)), Duration::from_millis(100))
            .await
            .unwrap_err();

        assert_eq!(err, ChainError::DeadlineExceeded { limit_ms: 100 });
        assert!(chain.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_within_bounds() {
        let config = SimulatorConfig {
            min_latency_ms: 200,
            max_latency_ms: 800,
            failure_rate: 0.0,
            deadline_ms: 1_000,
        };
        let chain = SimulatedChain::new(config).unwrap();
        let receipt = chain.submit(loan(dec!(10))).await.unwrap();
        assert!((200..=800).contains(&receipt.latency_ms));
    }

    #[tokio::test]
    async fn test_rejects_bad_requests() {
        let chain = SimulatedChain::new(SimulatorConfig::instant()).unwrap();
        assert!(matches!(
            chain.submit(loan(dec!(0))).await,
            Err(ChainError::InvalidAmount(_))
        ));
        assert!(matches!(
            chain.submit(loan(dec!(-5))).await,
            Err(ChainError::InvalidAmount(_))
        ));
        let anonymous = TxRequest::new(TxKind::Investment, "  ", dec!(5));
        assert!(matches!(
            chain.submit(anonymous).await,
            Err(ChainError::InvalidAddress(_))
        ));
        assert!(chain.is_empty());
    }

    #[tokio::test]
    async fn test_history_filters_by_sender() {
        let chain = SimulatedChain::new(SimulatorConfig::instant()).unwrap();
        chain.submit(loan(dec!(1))).await.unwrap();
        chain
            .submit(TxRequest::new(TxKind::Investment, "0xinvestor", dec!(3)))
            .await
            .unwrap();
        chain.submit(loan(dec!(2))).await.unwrap();

        let history = chain.history("0xborrower").await;
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|r| r.from == "0xborrower"));
        assert!(chain.history("0xnobody").await.is_empty());
    }

    #[test]
    fn test_config_validation() {
        assert!(SimulatorConfig::default().validate().is_ok());
        let inverted = SimulatorConfig {
            min_latency_ms: 10,
            max_latency_ms: 5,
            ..SimulatorConfig::default()
        };
        assert!(inverted.validate().is_err());
        let bad_rate = SimulatorConfig {
            failure_rate: 1.5,
            ..SimulatorConfig::default()
        };
        assert!(bad_rate.validate().is_err());
        let nan_rate = SimulatorConfig {
            failure_rate: f64::NAN,
            ..SimulatorConfig::default()
        };
        assert!(nan_rate.validate().is_err());
        let zero_deadline = SimulatorConfig {
            deadline_ms: 0,
            ..SimulatorConfig::default()
        };
        assert!(zero_deadline.validate().is_err());
    }

    #[test]
    fn test_new_rejects_unsampleable_config() {
        let inverted = SimulatorConfig {
            min_latency_ms: 10,
            max_latency_ms: 5,
            ..SimulatorConfig::instant()
        };
        assert!(matches!(
            SimulatedChain::new(inverted),
            Err(BlockBankError::Config(_))
        ));

        let nan_rate = SimulatorConfig {
            failure_rate: f64::NAN,
            ..SimulatorConfig::instant()
        };
        assert!(matches!(
            SimulatedChain::new(nan_rate),
            Err(BlockBankError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_default_simulator_is_usable() {
        let chain = SimulatedChain::default();
        assert!(chain.config().validate().is_ok());
        assert!(chain.is_empty());
    }
}
