//! CreditScore - Borrower creditworthiness metric (0-1000)
//!
//! The score itself is supplied by the caller. Block Bank only buckets it
//! into a [`CreditTier`], which drives:
//! - Base loan-to-value and base interest rate
//! - Insurance base premium rate
//! - NFT discount eligibility

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// Maximum possible credit score
pub const MAX_SCORE: u16 = 1000;

/// Minimum possible credit score
pub const MIN_SCORE: u16 = 0;

/// Validated credit score in `0..=1000`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u16")]
pub struct CreditScore(u16);

impl CreditScore {
    /// Create a credit score, rejecting values outside `0..=1000`
    pub fn new(raw: i64) -> Result<Self> {
        Ok(Self::try_from(raw)?)
    }

    #[inline]
    pub fn value(&self) -> u16 {
        self.0
    }

    /// Tier this score falls into
    #[inline]
    pub fn tier(&self) -> CreditTier {
        CreditTier::from_score(*self)
    }
}

impl TryFrom<i64> for CreditScore {
    type Error = ValidationError;

    fn try_from(raw: i64) -> std::result::Result<Self, Self::Error> {
        if raw < MIN_SCORE as i64 || raw > MAX_SCORE as i64 {
            return Err(ValidationError::CreditScoreOutOfRange {
                score: raw,
                min: MIN_SCORE,
                max: MAX_SCORE,
            });
        }
        Ok(Self(raw as u16))
    }
}

impl From<CreditScore> for u16 {
    fn from(score: CreditScore) -> Self {
        score.0
    }
}

impl fmt::Display for CreditScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, MAX_SCORE)
    }
}

/// Ordinal credit bucket, A is best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CreditTier {
    A,
    B,
    C,
    D,
}

impl CreditTier {
    /// All tiers from best to worst
    pub const ALL: [CreditTier; 4] = [CreditTier::A, CreditTier::B, CreditTier::C, CreditTier::D];

    /// Map a score to its tier
    ///
    /// Thresholds are checked top-down: `>= 800` A, `>= 600` B, `>= 400` C,
    /// everything below is D.
    pub fn from_score(score: CreditScore) -> Self {
        match score.value() {
            800.. => CreditTier::A,
            600.. => CreditTier::B,
            400.. => CreditTier::C,
            _ => CreditTier::D,
        }
    }

    /// Base loan-to-value percentage before NFT risk adjustment
    pub fn base_ltv(&self) -> f64 {
        match self {
            CreditTier::A => 70.0,
            CreditTier::B => 60.0,
            CreditTier::C => 50.0,
            CreditTier::D => 40.0,
        }
    }

    /// Base annual interest rate (percent) before NFT risk adjustment
    pub fn base_rate(&self) -> f64 {
        match self {
            CreditTier::A => 7.0,
            CreditTier::B => 9.0,
            CreditTier::C => 11.0,
            CreditTier::D => 13.5,
        }
    }

    /// Annual insurance premium as a percentage of the loan amount
    pub fn insurance_base_rate(&self) -> f64 {
        match self {
            CreditTier::A => 0.75,
            CreditTier::B => 1.5,
            CreditTier::C => 2.5,
            CreditTier::D => 4.0,
        }
    }
}

impl fmt::Display for CreditTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CreditTier::A => "A",
            CreditTier::B => "B",
            CreditTier::C => "C",
            CreditTier::D => "D",
        };
        f.write_str(s)
    }
}

/// Validate a raw score and resolve its tier
pub fn resolve_credit_tier(score: i64) -> Result<CreditTier> {
    Ok(CreditScore::new(score)?.tier())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tier(score: i64) -> CreditTier {
        resolve_credit_tier(score).unwrap()
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(tier(1000), CreditTier::A);
        assert_eq!(tier(800), CreditTier::A);
        assert_eq!(tier(799), CreditTier::B);
        assert_eq!(tier(600), CreditTier::B);
        assert_eq!(tier(599), CreditTier::C);
        assert_eq!(tier(400), CreditTier::C);
        assert_eq!(tier(399), CreditTier::D);
        assert_eq!(tier(0), CreditTier::D);
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(resolve_credit_tier(-1).is_err());
        assert!(resolve_credit_tier(1001).is_err());
        assert!(CreditScore::try_from(5000i64).is_err());
    }

    #[test]
    fn test_base_tables() {
        assert_eq!(CreditTier::A.base_ltv(), 70.0);
        assert_eq!(CreditTier::D.base_ltv(), 40.0);
        assert_eq!(CreditTier::B.base_rate(), 9.0);
        assert_eq!(CreditTier::D.base_rate(), 13.5);
        assert_eq!(CreditTier::C.insurance_base_rate(), 2.5);
    }

    #[test]
    fn test_score_serde_validates() {
        let score: CreditScore = serde_json::from_str("720").unwrap();
        assert_eq!(score.value(), 720);
        assert!(serde_json::from_str::<CreditScore>("1001").is_err());
        assert!(serde_json::from_str::<CreditScore>("-3").is_err());
        assert_eq!(serde_json::to_string(&score).unwrap(), "720");
    }

    #[test]
    fn test_display() {
        assert_eq!(CreditTier::B.to_string(), "B");
        assert_eq!(CreditScore::new(650).unwrap().to_string(), "650/1000");
    }

    proptest! {
        #[test]
        fn tier_never_improves_as_score_drops(score in 1i64..=1000) {
            // Ord on CreditTier puts A first, so a worse tier compares greater
            prop_assert!(tier(score - 1) >= tier(score));
        }
    }
}
