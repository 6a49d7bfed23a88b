//! Error types for Block Bank
//!
//! Provides a unified error type and domain-specific error variants

use thiserror::Error;

/// Result type alias using BlockBankError
pub type Result<T> = std::result::Result<T, BlockBankError>;

/// Unified error type for Block Bank operations
#[derive(Debug, Error)]
pub enum BlockBankError {
    // Input validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    // Chain submission errors
    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Input validation errors for pricing operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Credit score out of range: {score} (expected {min}..={max})")]
    CreditScoreOutOfRange { score: i64, min: u16, max: u16 },

    #[error("NFT risk score out of range: {score} (expected {min}..={max})")]
    RiskScoreOutOfRange { score: i64, min: u8, max: u8 },

    #[error("Invalid {field}: {value} (must be a finite, non-negative number)")]
    InvalidAmount { field: &'static str, value: f64 },
}

/// Simulated chain submission errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChainError {
    #[error("Invalid transaction amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid address: {0:?}")]
    InvalidAddress(String),

    #[error("Transaction rejected: {tx_hash} ({reason})")]
    Rejected { tx_hash: String, reason: String },

    #[error("Submission deadline exceeded after {limit_ms}ms")]
    DeadlineExceeded { limit_ms: u64 },

    #[error("Transaction not found: {0}")]
    NotFound(String),
}

impl From<serde_json::Error> for BlockBankError {
    fn from(err: serde_json::Error) -> Self {
        BlockBankError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for BlockBankError {
    fn from(err: anyhow::Error) -> Self {
        BlockBankError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BlockBankError::Validation(ValidationError::CreditScoreOutOfRange {
            score: 1200,
            min: 0,
            max: 1000,
        });
        assert!(err.to_string().contains("1200"));
        assert!(err.to_string().contains("0..=1000"));
    }

    #[test]
    fn test_chain_error() {
        let err = ChainError::DeadlineExceeded { limit_ms: 5000 };
        assert!(err.to_string().contains("5000ms"));
    }

    #[test]
    fn test_serde_error_conversion() {
        let parse = serde_json::from_str::<u16>("not-a-number").unwrap_err();
        let err: BlockBankError = parse.into();
        assert!(matches!(err, BlockBankError::Serialization(_)));
    }
}
