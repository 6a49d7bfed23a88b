//! Loan insurance pricing
//!
//! Annual premium = loan amount × tier base rate (%) × NFT risk multiplier / 100.
//!
//! Four preset coverage bundles are sold on top of that base premium. Each
//! bundle insures three risk dimensions (borrower default, market drop,
//! asset loss) and its premium multiplier is the product of the
//! per-dimension multipliers.

use blockbank_common::{ensure_amount, CreditTier, NftRiskClass, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conditions::{clamp_ltv, floor_rate, LoanConditions};

/// Preset coverage bundles, narrowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverageBundle {
    Basic,
    Standard,
    Complete,
    Premium,
}

impl CoverageBundle {
    pub const ALL: [CoverageBundle; 4] = [
        CoverageBundle::Basic,
        CoverageBundle::Standard,
        CoverageBundle::Complete,
        CoverageBundle::Premium,
    ];

    /// (default, market, asset) coverage percentages
    pub fn coverage(&self) -> (u8, u8, u8) {
        match self {
            CoverageBundle::Basic => (50, 0, 0),
            CoverageBundle::Standard => (75, 0, 0),
            CoverageBundle::Complete => (100, 50, 50),
            CoverageBundle::Premium => (100, 75, 75),
        }
    }

    /// Product of the per-dimension multipliers
    pub fn premium_multiplier(&self) -> f64 {
        let (default, market, asset) = self.coverage();
        default_multiplier(default) * market_multiplier(market) * asset_multiplier(asset)
    }

    /// LTV points added when the bundle is taken
    pub fn impact_on_ltv(&self) -> f64 {
        match self {
            CoverageBundle::Basic | CoverageBundle::Standard => 0.0,
            CoverageBundle::Complete | CoverageBundle::Premium => 5.0,
        }
    }

    /// Rate points added when the bundle is taken
    pub fn impact_on_rate(&self) -> f64 {
        match self {
            CoverageBundle::Basic | CoverageBundle::Standard => 0.0,
            CoverageBundle::Complete | CoverageBundle::Premium => -0.5,
        }
    }
}

fn default_multiplier(coverage: u8) -> f64 {
    match coverage {
        100.. => 1.4,
        75.. => 1.2,
        _ => 1.0,
    }
}

fn market_multiplier(coverage: u8) -> f64 {
    match coverage {
        75.. => 1.5,
        50.. => 1.3,
        _ => 1.0,
    }
}

fn asset_multiplier(coverage: u8) -> f64 {
    match coverage {
        75.. => 1.35,
        50.. => 1.2,
        _ => 1.0,
    }
}

/// A priced coverage bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceOption {
    pub bundle: CoverageBundle,
    pub default_coverage: u8,
    pub market_coverage: u8,
    pub asset_coverage: u8,
    pub premium_multiplier: f64,
    pub annual_premium: f64,
    pub impact_on_ltv: f64,
    pub impact_on_rate: f64,
}

impl InsuranceOption {
    fn priced(bundle: CoverageBundle, base_premium: f64) -> Self {
        let (default_coverage, market_coverage, asset_coverage) = bundle.coverage();
        let premium_multiplier = bundle.premium_multiplier();
        Self {
            bundle,
            default_coverage,
            market_coverage,
            asset_coverage,
            premium_multiplier,
            annual_premium: base_premium * premium_multiplier,
            impact_on_ltv: bundle.impact_on_ltv(),
            impact_on_rate: bundle.impact_on_rate(),
        }
    }
}

/// Annual premium for insuring `loan_amount`
pub fn calculate_insurance_premium(loan_amount: f64, tier: CreditTier, class: NftRiskClass) -> Result<f64> {
    ensure_amount("loan_amount", loan_amount)?;
    let premium = loan_amount * tier.insurance_base_rate() * class.insurance_multiplier() / 100.0;
    debug!(loan_amount, %tier, risk_class = %class, premium, "Calculated insurance premium");
    Ok(premium)
}

/// Price all four bundles for a loan
pub fn calculate_insurance_options(
    loan_amount: f64,
    tier: CreditTier,
    class: NftRiskClass,
) -> Result<[InsuranceOption; 4]> {
    let base_premium = calculate_insurance_premium(loan_amount, tier, class)?;
    Ok(insurance_options_from_premium(base_premium))
}

/// Price all four bundles from an already computed base premium
pub fn insurance_options_from_premium(base_premium: f64) -> [InsuranceOption; 4] {
    CoverageBundle::ALL.map(|bundle| InsuranceOption::priced(bundle, base_premium))
}

/// Loan conditions after taking an insurance option
///
/// The option's impact is applied on top of the final values, keeping the
/// same LTV cap and rate floor.
pub fn apply_insurance(conditions: &LoanConditions, option: &InsuranceOption) -> LoanConditions {
    LoanConditions {
        final_ltv: clamp_ltv(conditions.final_ltv + option.impact_on_ltv),
        final_rate: floor_rate(conditions.final_rate + option.impact_on_rate),
        ..*conditions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::conditions_for;

    #[test]
    fn test_premium_tier_a_safe() {
        let premium = calculate_insurance_premium(100_000.0, CreditTier::A, NftRiskClass::Safe).unwrap();
        assert!((premium - 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_premium_tier_d_risky() {
        // 50_000 × 4.0% × 1.3 = 2_600
        let premium = calculate_insurance_premium(50_000.0, CreditTier::D, NftRiskClass::Risky).unwrap();
        assert!((premium - 2_600.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_loan_rejected() {
        assert!(calculate_insurance_premium(-10.0, CreditTier::A, NftRiskClass::Safe).is_err());
    }

    #[test]
    fn test_four_bundles() {
        let options = insurance_options_from_premium(1_000.0);
        let coverages: Vec<_> = options
            .iter()
            .map(|o| (o.default_coverage, o.market_coverage, o.asset_coverage))
            .collect();
        assert_eq!(coverages, vec![(50, 0, 0), (75, 0, 0), (100, 50, 50), (100, 75, 75)]);

        assert!((options[0].annual_premium - 1_000.0).abs() < 1e-9);
        assert!((options[1].annual_premium - 1_200.0).abs() < 1e-9);
        // 1.4 × 1.3 × 1.2
        assert!((options[2].annual_premium - 2_184.0).abs() < 1e-9);
        // 1.4 × 1.5 × 1.35
        assert!((options[3].annual_premium - 2_835.0).abs() < 1e-9);
    }

    #[test]
    fn test_premiums_grow_with_coverage() {
        let options = calculate_insurance_options(80_000.0, CreditTier::B, NftRiskClass::Moderate).unwrap();
        assert!(options.windows(2).all(|w| w[0].annual_premium < w[1].annual_premium));
    }

    #[test]
    fn test_impacts() {
        let options = insurance_options_from_premium(100.0);
        assert_eq!((options[0].impact_on_ltv, options[0].impact_on_rate), (0.0, 0.0));
        assert_eq!((options[1].impact_on_ltv, options[1].impact_on_rate), (0.0, 0.0));
        assert_eq!((options[2].impact_on_ltv, options[2].impact_on_rate), (5.0, -0.5));
        assert_eq!((options[3].impact_on_ltv, options[3].impact_on_rate), (5.0, -0.5));
    }

    #[test]
    fn test_apply_insurance() {
        let conditions = conditions_for(CreditTier::A, NftRiskClass::Safe);
        let options = insurance_options_from_premium(100.0);

        let insured = apply_insurance(&conditions, &options[2]);
        assert_eq!(insured.final_ltv, 80.0);
        assert_eq!(insured.final_rate, 6.0);
        assert_eq!(insured.base_ltv, conditions.base_ltv);

        let uninsured = apply_insurance(&conditions, &options[0]);
        assert_eq!(uninsured, conditions);
    }

    #[test]
    fn test_apply_insurance_respects_cap_and_floor() {
        let near_limits = LoanConditions {
            final_ltv: 88.0,
            final_rate: 3.2,
            ..conditions_for(CreditTier::A, NftRiskClass::Safe)
        };
        let options = insurance_options_from_premium(100.0);

        for option in &options[2..] {
            let insured = apply_insurance(&near_limits, option);
            assert_eq!(insured.final_ltv, 90.0);
            assert_eq!(insured.final_rate, 3.0);
        }
    }
}
