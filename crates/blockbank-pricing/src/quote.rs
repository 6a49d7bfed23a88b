//! Quote engine
//!
//! Runs the whole rule set for one borrower and one NFT:
//!
//! ```text
//! score ──► tier ─┐
//!                 ├─► conditions ─► profiles
//! risk  ──► class ┘        │
//!                          ├─► insurance options (on the BALANCED loan)
//!                          └─► discount summary
//! ```

use blockbank_common::{CreditScore, NftCollateral, NftRiskProfile, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::conditions::{compose_loan_conditions, LoanConditions};
use crate::discount::{calculate_discount_summary, DiscountSummary};
use crate::insurance::{calculate_insurance_premium, insurance_options_from_premium, InsuranceOption};
use crate::profiles::{generate_loan_profiles, LoanProfileKind, LoanProfileOption};

/// Request for a full loan quote
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub credit_score: i64,
    pub nft_risk_score: i64,
    pub nft_value: f64,
    /// Price insurance into the profiles and discount
    #[serde(default = "default_true")]
    pub include_insurance: bool,
}

fn default_true() -> bool {
    true
}

impl QuoteRequest {
    pub fn new(credit_score: i64, nft_risk_score: i64, nft_value: f64) -> Self {
        Self {
            credit_score,
            nft_risk_score,
            nft_value,
            include_insurance: true,
        }
    }

    /// Quote without insurance
    pub fn without_insurance(mut self) -> Self {
        self.include_insurance = false;
        self
    }
}

/// Complete loan quote
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanQuote {
    pub quote_id: Uuid,
    pub credit_score: CreditScore,
    pub collateral: NftCollateral,
    pub conditions: LoanConditions,
    pub profiles: Vec<LoanProfileOption>,
    /// Annual premium of the base coverage on the BALANCED loan
    pub base_insurance_premium: f64,
    pub insurance_options: Vec<InsuranceOption>,
    pub discount: DiscountSummary,
    pub computed_at: i64,
    pub expires_at: i64,
}

impl LoanQuote {
    /// Default quote validity period (5 minutes)
    pub const DEFAULT_VALIDITY_MS: u64 = 5 * 60 * 1000;

    /// Longest validity a deployment may configure (24 hours)
    pub const MAX_VALIDITY_MS: u64 = 24 * 60 * 60 * 1000;

    /// Check if the quote is still valid
    pub fn is_valid(&self) -> bool {
        chrono::Utc::now().timestamp_millis() < self.expires_at
    }

    pub fn profile(&self, kind: LoanProfileKind) -> Option<&LoanProfileOption> {
        self.profiles.iter().find(|p| p.kind == kind)
    }
}

/// Stateless quote engine
#[derive(Debug, Clone)]
pub struct QuoteEngine {
    validity_ms: u64,
}

impl Default for QuoteEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteEngine {
    pub fn new() -> Self {
        Self {
            validity_ms: LoanQuote::DEFAULT_VALIDITY_MS,
        }
    }

    /// Override how long issued quotes stay valid
    pub fn with_validity_ms(mut self, validity_ms: u64) -> Self {
        self.validity_ms = validity_ms;
        self
    }

    #[instrument(skip(self), fields(credit_score = request.credit_score, nft_risk_score = request.nft_risk_score))]
    pub fn quote(&self, request: &QuoteRequest) -> Result<LoanQuote> {
        let credit_score = CreditScore::new(request.credit_score)?;
        let risk = NftRiskProfile::new(request.nft_risk_score)?;
        let collateral = NftCollateral::new(request.nft_value, risk)?;

        let conditions = compose_loan_conditions(credit_score, &risk);

        // Insurance is priced on the BALANCED loan amount
        let balanced_loan = collateral.value * (100.0 - LoanProfileKind::Balanced.down_payment_percent()) / 100.0;
        let base_insurance_premium =
            calculate_insurance_premium(balanced_loan, conditions.credit_tier, conditions.nft_risk_class)?;

        let (premium, insurance_options) = if request.include_insurance {
            (Some(base_insurance_premium), insurance_options_from_premium(base_insurance_premium).to_vec())
        } else {
            (None, Vec::new())
        };

        let profiles = generate_loan_profiles(collateral.value, &conditions, premium)?;
        let discount = calculate_discount_summary(
            &collateral,
            conditions.credit_tier,
            conditions.base_ltv,
            conditions.base_rate,
            premium.unwrap_or(0.0),
        )?;

        let now = chrono::Utc::now().timestamp_millis();
        let quote = LoanQuote {
            quote_id: Uuid::now_v7(),
            credit_score,
            collateral,
            conditions,
            profiles: profiles.to_vec(),
            base_insurance_premium,
            insurance_options,
            discount,
            computed_at: now,
            expires_at: expiry(now, self.validity_ms),
        };

        info!(
            quote_id = %quote.quote_id,
            tier = %conditions.credit_tier,
            risk_class = %conditions.nft_risk_class,
            final_ltv = conditions.final_ltv,
            final_rate = conditions.final_rate,
            discount = %quote.discount.discount_level,
            "Issued loan quote"
        );
        Ok(quote)
    }
}

/// Expiry timestamp, saturating instead of wrapping on huge validities
fn expiry(now_ms: i64, validity_ms: u64) -> i64 {
    i64::try_from(validity_ms)
        .ok()
        .and_then(|v| now_ms.checked_add(v))
        .unwrap_or(i64::MAX)
}
