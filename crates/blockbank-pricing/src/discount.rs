//! NFT discount calculator
//!
//! A discount level (10/15/20%) is picked from the NFT risk class and the
//! borrower's credit tier. The level sets the minimum up-front payment,
//! lowers the effective LTV and grants rate and premium reductions.

use std::fmt;

use blockbank_common::{ensure_amount, CreditTier, NftCollateral, NftRiskClass, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conditions::floor_rate;

/// Discount tier in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum DiscountLevel {
    Ten,
    Fifteen,
    Twenty,
}

impl DiscountLevel {
    pub fn percent(&self) -> u8 {
        match self {
            DiscountLevel::Ten => 10,
            DiscountLevel::Fifteen => 15,
            DiscountLevel::Twenty => 20,
        }
    }

    /// Rate points taken off the base rate
    pub fn rate_reduction(&self) -> f64 {
        match self {
            DiscountLevel::Twenty => 0.5,
            DiscountLevel::Fifteen => 0.25,
            DiscountLevel::Ten => 0.0,
        }
    }

    /// Percentage taken off the insurance premium
    pub fn insurance_discount_percent(&self) -> f64 {
        match self {
            DiscountLevel::Twenty => 10.0,
            DiscountLevel::Fifteen => 5.0,
            DiscountLevel::Ten => 0.0,
        }
    }
}

impl From<DiscountLevel> for u8 {
    fn from(level: DiscountLevel) -> Self {
        level.percent()
    }
}

impl TryFrom<u8> for DiscountLevel {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            10 => Ok(DiscountLevel::Ten),
            15 => Ok(DiscountLevel::Fifteen),
            20 => Ok(DiscountLevel::Twenty),
            other => Err(format!("unsupported discount level: {other}")),
        }
    }
}

impl fmt::Display for DiscountLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// Pick the discount level; the first matching rule wins
///
/// 1. SAFE collateral with an A or B borrower: 20%
/// 2. SAFE or MODERATE collateral with an A, B or C borrower: 15%
/// 3. Everything else: 10%
pub fn calculate_discount_level(class: NftRiskClass, tier: CreditTier) -> DiscountLevel {
    use CreditTier::*;
    use NftRiskClass::*;

    match (class, tier) {
        (Safe, A | B) => DiscountLevel::Twenty,
        (Safe | Moderate, A | B | C) => DiscountLevel::Fifteen,
        _ => DiscountLevel::Ten,
    }
}

/// Full effect of the discount on one loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountSummary {
    pub discount_level: DiscountLevel,
    /// Up-front payment required, `value × level / 100`
    pub minimum_payment: f64,
    pub effective_ltv: f64,
    pub loan_amount: f64,
    pub base_rate: f64,
    pub rate_reduction: f64,
    pub final_rate: f64,
    pub base_insurance_premium: f64,
    pub insurance_discount_percent: f64,
    pub final_insurance_premium: f64,
    /// Premium saved by the discount
    pub total_savings: f64,
}

/// Apply the discount rules to a collateralised loan
pub fn calculate_discount_summary(
    nft: &NftCollateral,
    tier: CreditTier,
    base_ltv: f64,
    base_rate: f64,
    base_insurance_premium: f64,
) -> Result<DiscountSummary> {
    ensure_amount("nft_value", nft.value)?;
    ensure_amount("base_insurance_premium", base_insurance_premium)?;

    let level = calculate_discount_level(nft.risk.risk_class, tier);
    let percent = level.percent() as f64;

    let minimum_payment = nft.value * percent / 100.0;
    let effective_ltv = (base_ltv - percent).max(0.0);
    let loan_amount = nft.value * effective_ltv / 100.0;

    let rate_reduction = level.rate_reduction();
    let final_rate = floor_rate(base_rate - rate_reduction);

    let insurance_discount_percent = level.insurance_discount_percent();
    let final_insurance_premium = base_insurance_premium * (1.0 - insurance_discount_percent / 100.0);

    debug!(
        level = %level,
        %tier,
        risk_class = %nft.risk.risk_class,
        effective_ltv,
        final_rate,
        "Calculated NFT discount"
    );

    Ok(DiscountSummary {
        discount_level: level,
        minimum_payment,
        effective_ltv,
        loan_amount,
        base_rate,
        rate_reduction,
        final_rate,
        base_insurance_premium,
        insurance_discount_percent,
        final_insurance_premium,
        total_savings: base_insurance_premium - final_insurance_premium,
    })
}
