//! Loan condition composer
//!
//! ```text
//! final LTV  = min(tier base LTV  + risk LTV adjustment,  90)
//! final rate = max(tier base rate + risk rate adjustment, 3.0)
//! ```

use blockbank_common::{CreditScore, CreditTier, NftRiskClass, NftRiskProfile, MAX_LTV, MIN_RATE};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Derived loan terms for one borrower / collateral pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanConditions {
    pub base_ltv: f64,
    pub adjusted_ltv: f64,
    pub final_ltv: f64,
    pub base_rate: f64,
    pub adjusted_rate: f64,
    pub final_rate: f64,
    pub credit_tier: CreditTier,
    pub nft_risk_class: NftRiskClass,
}

/// Compose loan conditions from a credit score and NFT risk profile
pub fn compose_loan_conditions(score: CreditScore, risk: &NftRiskProfile) -> LoanConditions {
    let conditions = conditions_for(score.tier(), risk.risk_class);
    debug!(
        score = score.value(),
        tier = %conditions.credit_tier,
        risk_class = %conditions.nft_risk_class,
        final_ltv = conditions.final_ltv,
        final_rate = conditions.final_rate,
        "Composed loan conditions"
    );
    conditions
}

/// Compose loan conditions directly from an already resolved tier and class
pub fn conditions_for(tier: CreditTier, class: NftRiskClass) -> LoanConditions {
    let base_ltv = tier.base_ltv();
    let base_rate = tier.base_rate();

    let adjusted_ltv = base_ltv + class.ltv_adjustment();
    let adjusted_rate = base_rate + class.rate_adjustment();

    LoanConditions {
        base_ltv,
        adjusted_ltv,
        final_ltv: clamp_ltv(adjusted_ltv),
        base_rate,
        adjusted_rate,
        final_rate: floor_rate(adjusted_rate),
        credit_tier: tier,
        nft_risk_class: class,
    }
}

#[inline]
pub(crate) fn clamp_ltv(ltv: f64) -> f64 {
    ltv.min(MAX_LTV)
}

#[inline]
pub(crate) fn floor_rate(rate: f64) -> f64 {
    rate.max(MIN_RATE)
}
