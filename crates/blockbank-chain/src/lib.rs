//! # Block Bank Chain
//!
//! Async chain access for Block Bank.
//!
//! - [`ChainClient`]: submit transactions with a deadline, look up receipts
//! - [`SimulatedChain`]: local settlement with random latency and failures
//! - [`services`]: typed loan, NFT, insurance, investment and history services

pub mod client;
pub mod services;
pub mod types;

pub use client::{ChainClient, SimulatedChain, SimulatorConfig};
pub use services::{InsuranceService, InvestmentService, LoanService, NftService, TransactionService};
pub use types::{TxKind, TxReceipt, TxRequest, TxStatus};
