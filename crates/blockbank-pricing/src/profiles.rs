//! Loan profile generator
//!
//! Every NFT value yields exactly three offers over the same collateral,
//! differing only in how much the borrower pays up front:
//!
//! | Profile      | Down payment | Rate offset | Premium scale | Insurance |
//! |--------------|--------------|-------------|---------------|-----------|
//! | SAFE         | 50%          | -0.5        | x0.8          | optional  |
//! | BALANCED     | 35%          | 0           | x1.0          | optional  |
//! | MAX_LEVERAGE | 15%          | +1.0        | x1.2          | required  |

use blockbank_common::{ensure_amount, Result, LOAN_DURATION_MONTHS};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conditions::{floor_rate, LoanConditions};

/// The three offered leverage profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanProfileKind {
    Safe,
    Balanced,
    MaxLeverage,
}

impl LoanProfileKind {
    pub const ALL: [LoanProfileKind; 3] = [
        LoanProfileKind::Safe,
        LoanProfileKind::Balanced,
        LoanProfileKind::MaxLeverage,
    ];

    /// Share of the NFT value paid up front
    pub fn down_payment_percent(&self) -> f64 {
        match self {
            LoanProfileKind::Safe => 50.0,
            LoanProfileKind::Balanced => 35.0,
            LoanProfileKind::MaxLeverage => 15.0,
        }
    }

    /// Offset applied to the composed final rate
    pub fn rate_offset(&self) -> f64 {
        match self {
            LoanProfileKind::Safe => -0.5,
            LoanProfileKind::Balanced => 0.0,
            LoanProfileKind::MaxLeverage => 1.0,
        }
    }

    pub fn premium_scale(&self) -> f64 {
        match self {
            LoanProfileKind::Safe => 0.8,
            LoanProfileKind::Balanced => 1.0,
            LoanProfileKind::MaxLeverage => 1.2,
        }
    }

    pub fn insurance_required(&self) -> bool {
        matches!(self, LoanProfileKind::MaxLeverage)
    }
}

/// One concrete loan offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanProfileOption {
    pub kind: LoanProfileKind,
    pub down_payment_percent: f64,
    pub down_payment: f64,
    pub loan_amount: f64,
    /// Loan amount as a percentage of the NFT value
    pub ltv: f64,
    pub interest_rate: f64,
    pub duration_months: u32,
    pub monthly_payment: f64,
    pub insurance_required: bool,
    pub insurance_premium: f64,
    /// `loan_amount + monthly_payment * duration + insurance_premium`
    pub total_cost: f64,
    /// Whether this profile's LTV fits under the composed final LTV
    pub within_max_ltv: bool,
}

/// Monthly installment of a fully amortising loan
///
/// `P * r * (1 + r)^n / ((1 + r)^n - 1)` with `r = annual_rate / 100 / 12`.
/// A zero rate degenerates to `P / n`; a zero term returns the principal.
pub fn monthly_payment(principal: f64, annual_rate: f64, months: u32) -> f64 {
    if months == 0 {
        return principal;
    }

    let monthly_rate = annual_rate / 100.0 / 12.0;
    if monthly_rate == 0.0 {
        return principal / months as f64;
    }

    let factor = (1.0 + monthly_rate).powi(months as i32);
    principal * monthly_rate * factor / (factor - 1.0)
}

/// Generate the SAFE, BALANCED and MAX_LEVERAGE offers for one NFT
pub fn generate_loan_profiles(
    nft_value: f64,
    conditions: &LoanConditions,
    insurance_premium: Option<f64>,
) -> Result<[LoanProfileOption; 3]> {
    ensure_amount("nft_value", nft_value)?;
    let base_premium = match insurance_premium {
        Some(premium) => ensure_amount("insurance_premium", premium)?,
        None => 0.0,
    };

    let profiles = LoanProfileKind::ALL.map(|kind| build_profile(kind, nft_value, conditions, base_premium));

    debug!(
        nft_value,
        final_rate = conditions.final_rate,
        final_ltv = conditions.final_ltv,
        "Generated loan profiles"
    );
    Ok(profiles)
}

fn build_profile(
    kind: LoanProfileKind,
    nft_value: f64,
    conditions: &LoanConditions,
    base_premium: f64,
) -> LoanProfileOption {
    let down_payment_percent = kind.down_payment_percent();
    let down_payment = nft_value * down_payment_percent / 100.0;
    let loan_amount = nft_value - down_payment;
    let ltv = 100.0 - down_payment_percent;

    let interest_rate = floor_rate(conditions.final_rate + kind.rate_offset());
    let duration_months = LOAN_DURATION_MONTHS;
    let payment = monthly_payment(loan_amount, interest_rate, duration_months);
    let insurance_premium = base_premium * kind.premium_scale();

    LoanProfileOption {
        kind,
        down_payment_percent,
        down_payment,
        loan_amount,
        ltv,
        interest_rate,
        duration_months,
        monthly_payment: payment,
        insurance_required: kind.insurance_required(),
        insurance_premium,
        total_cost: loan_amount + payment * duration_months as f64 + insurance_premium,
        within_max_ltv: ltv <= conditions.final_ltv,
    }
}
