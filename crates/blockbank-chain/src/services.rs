//! Typed transaction services
//!
//! Each service turns one business action into a [`TxRequest`] and waits
//! for it to settle. A receipt that settled as failed is surfaced as
//! [`ChainError::Rejected`], so callers only see `Ok` for confirmed
//! transactions.

use std::sync::Arc;

use blockbank_common::ChainError;
use rust_decimal::Decimal;

use crate::client::ChainClient;
use crate::types::{TxKind, TxReceipt, TxRequest, TxStatus};

async fn confirm(chain: &dyn ChainClient, request: TxRequest) -> Result<TxReceipt, ChainError> {
    let receipt = chain.submit(request).await?;
    match receipt.status {
        TxStatus::Confirmed => Ok(receipt),
        TxStatus::Failed { reason } => Err(ChainError::Rejected {
            tx_hash: receipt.tx_hash,
            reason,
        }),
    }
}

/// Loan origination and repayment
#[derive(Clone)]
pub struct LoanService {
    chain: Arc<dyn ChainClient>,
}

impl LoanService {
    pub fn new(chain: Arc<dyn ChainClient>) -> Self {
        Self { chain }
    }

    /// Disburse `principal` to `borrower`
    pub async fn originate(
        &self,
        borrower: &str,
        principal: Decimal,
        loan_id: Option<&str>,
    ) -> Result<TxReceipt, ChainError> {
        let mut request = TxRequest::new(TxKind::LoanOrigination, borrower, principal);
        request.reference = loan_id.map(str::to_string);
        confirm(self.chain.as_ref(), request).await
    }

    /// Pay `amount` back against a loan
    pub async fn repay(
        &self,
        borrower: &str,
        amount: Decimal,
        loan_id: Option<&str>,
    ) -> Result<TxReceipt, ChainError> {
        let mut request = TxRequest::new(TxKind::LoanRepayment, borrower, amount);
        request.reference = loan_id.map(str::to_string);
        confirm(self.chain.as_ref(), request).await
    }
}

/// NFT collateral custody
#[derive(Clone)]
pub struct NftService {
    chain: Arc<dyn ChainClient>,
}

impl NftService {
    pub fn new(chain: Arc<dyn ChainClient>) -> Self {
        Self { chain }
    }

    /// Lock an NFT appraised at `value` as collateral
    pub async fn lock_collateral(&self, owner: &str, token_id: &str, value: Decimal) -> Result<TxReceipt, ChainError> {
        let request = TxRequest::new(TxKind::CollateralLock, owner, value).with_reference(token_id);
        confirm(self.chain.as_ref(), request).await
    }

    pub async fn release_collateral(&self, owner: &str, token_id: &str, value: Decimal) -> Result<TxReceipt, ChainError> {
        let request = TxRequest::new(TxKind::CollateralRelease, owner, value).with_reference(token_id);
        confirm(self.chain.as_ref(), request).await
    }
}

/// Loan insurance purchases
#[derive(Clone)]
pub struct InsuranceService {
    chain: Arc<dyn ChainClient>,
}

impl InsuranceService {
    pub fn new(chain: Arc<dyn ChainClient>) -> Self {
        Self { chain }
    }

    /// Pay the annual premium for a policy
    pub async fn purchase(&self, holder: &str, policy_id: &str, premium: Decimal) -> Result<TxReceipt, ChainError> {
        let request = TxRequest::new(TxKind::InsurancePurchase, holder, premium).with_reference(policy_id);
        confirm(self.chain.as_ref(), request).await
    }
}

/// Lending pool deposits
#[derive(Clone)]
pub struct InvestmentService {
    chain: Arc<dyn ChainClient>,
}

impl InvestmentService {
    pub fn new(chain: Arc<dyn ChainClient>) -> Self {
        Self { chain }
    }

    pub async fn invest(&self, investor: &str, pool_id: &str, amount: Decimal) -> Result<TxReceipt, ChainError> {
        let request = TxRequest::new(TxKind::Investment, investor, amount).with_reference(pool_id);
        confirm(self.chain.as_ref(), request).await
    }
}

/// Read access to settled transactions
#[derive(Clone)]
pub struct TransactionService {
    chain: Arc<dyn ChainClient>,
}

impl TransactionService {
    pub fn new(chain: Arc<dyn ChainClient>) -> Self {
        Self { chain }
    }

    pub async fn status(&self, tx_hash: &str) -> Result<TxReceipt, ChainError> {
        self.chain
            .receipt(tx_hash)
            .await
            .ok_or_else(|| ChainError::NotFound(tx_hash.to_string()))
    }

    pub async fn history(&self, address: &str) -> Vec<TxReceipt> {
        self.chain.history(address).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{SimulatedChain, SimulatorConfig};
    use rust_decimal_macros::dec;

    fn instant() -> Arc<dyn ChainClient> {
        Arc::new(SimulatedChain::new(SimulatorConfig::instant()).unwrap())
    }

    #[tokio::test]
    async fn test_loan_lifecycle() {
        let chain = instant();
        let loans = LoanService::new(chain.clone());
        let txs = TransactionService::new(chain);

        let origination = loans.originate("0xalice", dec!(6500), Some("loan-7")).await.unwrap();
        assert_eq!(origination.kind, TxKind::LoanOrigination);
        assert_eq!(origination.reference.as_deref(), Some("loan-7"));

        let repayment = loans.repay("0xalice", dec!(200.55), Some("loan-7")).await.unwrap();
        assert_eq!(repayment.kind, TxKind::LoanRepayment);

        let history = txs.history("0xalice").await;
        assert_eq!(history.len(), 2);
        assert_eq!(txs.status(&repayment.tx_hash).await.unwrap(), repayment);
    }

    #[tokio::test]
    async fn test_failed_settlement_is_rejected() {
        let chain: Arc<dyn ChainClient> = Arc::new(SimulatedChain::new(SimulatorConfig {
            failure_rate: 1.0,
            ..SimulatorConfig::instant()
        })
        .unwrap());
        let insurance = InsuranceService::new(chain.clone());

        let err = insurance.purchase("0xbob", "policy-1", dec!(390)).await.unwrap_err();
        let tx_hash = match err {
            ChainError::Rejected { tx_hash, .. } => tx_hash,
            other => panic!("expected rejection, got {other:?}"),
        };

        // The failed receipt is still queryable
        let receipt = TransactionService::new(chain).status(&tx_hash).await.unwrap();
        assert!(!receipt.status.is_confirmed());
    }

    #[tokio::test]
    async fn test_collateral_and_investment() {
        let chain = instant();
        let nfts = NftService::new(chain.clone());
        let pools = InvestmentService::new(chain.clone());

        let lock = nfts.lock_collateral("0xcarol", "punk-42", dec!(100000)).await.unwrap();
        assert_eq!(lock.kind, TxKind::CollateralLock);
        let release = nfts.release_collateral("0xcarol", "punk-42", dec!(100000)).await.unwrap();
        assert_eq!(release.kind, TxKind::CollateralRelease);

        let deposit = pools.invest("0xdave", "pool-a", dec!(2500)).await.unwrap();
        assert_eq!(deposit.kind, TxKind::Investment);
        assert_eq!(deposit.reference.as_deref(), Some("pool-a"));
    }

    #[tokio::test]
    async fn test_unknown_transaction() {
        let txs = TransactionService::new(instant());
        assert!(matches!(txs.status("0xdeadbeef").await, Err(ChainError::NotFound(_))));
    }
}
