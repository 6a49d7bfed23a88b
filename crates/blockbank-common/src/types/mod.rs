//! Core value types for Block Bank pricing

pub mod credit;
pub mod nft_risk;
