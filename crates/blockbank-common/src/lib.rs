//! # Block Bank Common
//!
//! Shared types, errors, and risk primitives for Block Bank.
//!
//! ## Core Types
//!
//! - [`CreditScore`]: validated 0-1000 borrower score
//! - [`CreditTier`]: A-D bucket with base LTV, rate and insurance tables
//! - [`NftRiskProfile`]: 0-100 risk score with its derived [`NftRiskClass`]
//! - [`NftCollateral`]: appraised NFT offered against a loan

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{BlockBankError, ChainError, Result, ValidationError};
pub use types::{
    credit::{resolve_credit_tier, CreditScore, CreditTier},
    nft_risk::{ensure_amount, resolve_nft_risk_class, NftCollateral, NftRiskClass, NftRiskProfile},
};

/// Block Bank version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Hard cap on any loan-to-value percentage
pub const MAX_LTV: f64 = 90.0;

/// Floor on any annual interest rate (percent)
pub const MIN_RATE: f64 = 3.0;

/// Loan duration for generated profiles, in months
pub const LOAN_DURATION_MONTHS: u32 = 36;
