//! NFT risk classification and collateral
//!
//! Every NFT offered as collateral carries a risk score (0-100) from the
//! valuation side. The score is bucketed into an [`NftRiskClass`] that
//! adjusts LTV, interest rate and insurance premium.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// Maximum NFT risk score
pub const MAX_RISK_SCORE: u8 = 100;

/// Highest score still classified as SAFE
pub const SAFE_THRESHOLD: u8 = 30;

/// Highest score still classified as MODERATE
pub const MODERATE_THRESHOLD: u8 = 60;

/// NFT risk bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NftRiskClass {
    Safe,
    Moderate,
    Risky,
}

impl NftRiskClass {
    pub const ALL: [NftRiskClass; 3] = [NftRiskClass::Safe, NftRiskClass::Moderate, NftRiskClass::Risky];

    fn from_score(risk_score: u8) -> Self {
        if risk_score <= SAFE_THRESHOLD {
            NftRiskClass::Safe
        } else if risk_score <= MODERATE_THRESHOLD {
            NftRiskClass::Moderate
        } else {
            NftRiskClass::Risky
        }
    }

    /// LTV percentage points added to the tier's base LTV
    pub fn ltv_adjustment(&self) -> f64 {
        match self {
            NftRiskClass::Safe => 5.0,
            NftRiskClass::Moderate => 0.0,
            NftRiskClass::Risky => -10.0,
        }
    }

    /// Rate percentage points added to the tier's base rate
    pub fn rate_adjustment(&self) -> f64 {
        match self {
            NftRiskClass::Safe => -0.5,
            NftRiskClass::Moderate => 0.0,
            NftRiskClass::Risky => 1.5,
        }
    }

    /// Multiplier applied to the tier's insurance base premium
    pub fn insurance_multiplier(&self) -> f64 {
        match self {
            NftRiskClass::Safe => 0.8,
            NftRiskClass::Moderate => 1.0,
            NftRiskClass::Risky => 1.3,
        }
    }
}

impl fmt::Display for NftRiskClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NftRiskClass::Safe => "SAFE",
            NftRiskClass::Moderate => "MODERATE",
            NftRiskClass::Risky => "RISKY",
        };
        f.write_str(s)
    }
}

/// Validate a raw risk score and resolve its class
pub fn resolve_nft_risk_class(risk_score: i64) -> Result<NftRiskClass> {
    Ok(NftRiskProfile::new(risk_score)?.risk_class)
}

/// Risk score together with its derived class
///
/// The class is never stored independently: deserialisation reads only the
/// score and recomputes the class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRiskProfile", rename_all = "camelCase")]
pub struct NftRiskProfile {
    pub risk_score: u8,
    pub risk_class: NftRiskClass,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRiskProfile {
    risk_score: i64,
}

impl TryFrom<RawRiskProfile> for NftRiskProfile {
    type Error = ValidationError;

    fn try_from(raw: RawRiskProfile) -> std::result::Result<Self, Self::Error> {
        Self::checked(raw.risk_score)
    }
}

impl NftRiskProfile {
    /// Build a profile from a raw score, rejecting values outside `0..=100`
    pub fn new(risk_score: i64) -> Result<Self> {
        Ok(Self::checked(risk_score)?)
    }

    fn checked(risk_score: i64) -> std::result::Result<Self, ValidationError> {
        if !(0..=MAX_RISK_SCORE as i64).contains(&risk_score) {
            return Err(ValidationError::RiskScoreOutOfRange {
                score: risk_score,
                min: 0,
                max: MAX_RISK_SCORE,
            });
        }
        let risk_score = risk_score as u8;
        Ok(Self {
            risk_score,
            risk_class: NftRiskClass::from_score(risk_score),
        })
    }
}

/// An NFT pledged as loan collateral
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftCollateral {
    /// Appraised value
    pub value: f64,
    pub risk: NftRiskProfile,
}

impl NftCollateral {
    pub fn new(value: f64, risk: NftRiskProfile) -> Result<Self> {
        ensure_amount("nft_value", value)?;
        Ok(Self { value, risk })
    }
}

/// Reject negative, NaN and infinite monetary inputs
pub fn ensure_amount(field: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidAmount { field, value }.into());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(score: i64) -> NftRiskClass {
        resolve_nft_risk_class(score).unwrap()
    }

    #[test]
    fn test_class_boundaries() {
        assert_eq!(class(0), NftRiskClass::Safe);
        assert_eq!(class(30), NftRiskClass::Safe);
        assert_eq!(class(31), NftRiskClass::Moderate);
        assert_eq!(class(60), NftRiskClass::Moderate);
        assert_eq!(class(61), NftRiskClass::Risky);
        assert_eq!(class(100), NftRiskClass::Risky);
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(resolve_nft_risk_class(-1).is_err());
        assert!(resolve_nft_risk_class(101).is_err());
    }

    #[test]
    fn test_deserialize_recomputes_class() {
        // A stale class in the payload is ignored
        let profile: NftRiskProfile =
            serde_json::from_str(r#"{"riskScore": 75, "riskClass": "SAFE"}"#).unwrap();
        assert_eq!(profile.risk_class, NftRiskClass::Risky);

        assert!(serde_json::from_str::<NftRiskProfile>(r#"{"riskScore": 140}"#).is_err());
    }

    #[test]
    fn test_serialize_shape() {
        let profile = NftRiskProfile::new(45).unwrap();
        let json = serde_json::to_value(profile).unwrap();
        assert_eq!(json["riskScore"], 45);
        assert_eq!(json["riskClass"], "MODERATE");
    }

    #[test]
    fn test_collateral_rejects_bad_values() {
        let risk = NftRiskProfile::new(10).unwrap();
        assert!(NftCollateral::new(-1.0, risk).is_err());
        assert!(NftCollateral::new(f64::NAN, risk).is_err());
        assert!(NftCollateral::new(0.0, risk).is_ok());
    }

    #[test]
    fn test_adjustment_tables() {
        assert_eq!(NftRiskClass::Safe.ltv_adjustment(), 5.0);
        assert_eq!(NftRiskClass::Risky.ltv_adjustment(), -10.0);
        assert_eq!(NftRiskClass::Safe.rate_adjustment(), -0.5);
        assert_eq!(NftRiskClass::Risky.rate_adjustment(), 1.5);
        assert_eq!(NftRiskClass::Risky.insurance_multiplier(), 1.3);
    }
}
