//! # Block Bank Pricing
//!
//! Loan, insurance and discount rules for NFT-collateralised lending.
//!
//! ## Components
//!
//! - [`conditions`]: tier base values + NFT risk adjustments, capped LTV and floored rate
//! - [`profiles`]: SAFE / BALANCED / MAX_LEVERAGE offers with amortised payments
//! - [`insurance`]: annual premium and the four coverage bundles
//! - [`discount`]: 10/15/20% discount levels and their effect on a loan
//! - [`quote`]: everything above for one request
//!
//! All functions are pure; the same inputs always produce the same outputs.

pub mod conditions;
pub mod discount;
pub mod insurance;
pub mod profiles;
pub mod quote;

pub use conditions::{compose_loan_conditions, conditions_for, LoanConditions};
pub use discount::{calculate_discount_level, calculate_discount_summary, DiscountLevel, DiscountSummary};
pub use insurance::{
    apply_insurance, calculate_insurance_options, calculate_insurance_premium,
    insurance_options_from_premium, CoverageBundle, InsuranceOption,
};
pub use profiles::{generate_loan_profiles, monthly_payment, LoanProfileKind, LoanProfileOption};
pub use quote::{LoanQuote, QuoteEngine, QuoteRequest};
