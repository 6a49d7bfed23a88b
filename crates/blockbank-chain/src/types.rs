//! Transaction types shared by the chain client and services

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What a transaction does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxKind {
    LoanOrigination,
    LoanRepayment,
    CollateralLock,
    CollateralRelease,
    InsurancePurchase,
    Investment,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::LoanOrigination => "loan_origination",
            TxKind::LoanRepayment => "loan_repayment",
            TxKind::CollateralLock => "collateral_lock",
            TxKind::CollateralRelease => "collateral_release",
            TxKind::InsurancePurchase => "insurance_purchase",
            TxKind::Investment => "investment",
        }
    }
}

/// Transaction submitted to the chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxRequest {
    pub kind: TxKind,
    /// Sending account
    pub from: String,
    pub amount: Decimal,
    /// Loan id, NFT token id, policy id...
    pub reference: Option<String>,
}

impl TxRequest {
    pub fn new(kind: TxKind, from: impl Into<String>, amount: Decimal) -> Self {
        Self {
            kind,
            from: from.into(),
            amount,
            reference: None,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

/// Final state of a settled transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TxStatus {
    Confirmed,
    Failed { reason: String },
}

impl TxStatus {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, TxStatus::Confirmed)
    }
}

/// Settled transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    /// `0x` followed by 64 hex characters
    pub tx_hash: String,
    pub kind: TxKind,
    pub from: String,
    pub amount: Decimal,
    pub reference: Option<String>,
    pub status: TxStatus,
    /// Block the transaction landed in; `None` when it failed
    pub block_number: Option<u64>,
    pub submitted_at: i64,
    pub settled_at: i64,
    pub latency_ms: u64,
}
