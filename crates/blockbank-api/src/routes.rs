//! REST routes
//!
//! Request and response bodies use camelCase field names.

use axum::{
    extract::{Path, State},
    http::{header, Method},
    response::Json,
    routing::{get, post},
    Router,
};
use blockbank_chain::TxReceipt;
use blockbank_common::{CreditScore, CreditTier, NftCollateral, NftRiskProfile};
use blockbank_pricing::{
    calculate_discount_summary, calculate_insurance_options, calculate_insurance_premium,
    compose_loan_conditions, generate_loan_profiles, DiscountSummary, InsuranceOption, LoanConditions,
    LoanProfileOption, LoanQuote, QuoteRequest,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditTierBody {
    pub score: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditTierResponse {
    pub score: CreditScore,
    pub tier: CreditTier,
    pub base_ltv: f64,
    pub base_rate: f64,
    pub insurance_base_rate: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftRiskBody {
    pub risk_score: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionsBody {
    pub credit_score: i64,
    pub nft_risk_score: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollateralBody {
    pub credit_score: i64,
    pub nft_risk_score: i64,
    pub nft_value: f64,
    pub insurance_premium: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceBody {
    pub loan_amount: f64,
    pub credit_score: i64,
    pub nft_risk_score: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumResponse {
    pub annual_premium: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTxBody {
    pub borrower: String,
    pub amount: Decimal,
    pub reference: Option<String>,
}

/// Validate raw scores and compose the loan conditions
fn resolve(credit_score: i64, nft_risk_score: i64) -> Result<(NftRiskProfile, LoanConditions), ApiError> {
    let score = CreditScore::new(credit_score)?;
    let risk = NftRiskProfile::new(nft_risk_score)?;
    Ok((risk, compose_loan_conditions(score, &risk)))
}

async fn credit_tier(Json(body): Json<CreditTierBody>) -> ApiResult<CreditTierResponse> {
    let score = CreditScore::new(body.score)?;
    let tier = score.tier();
    Ok(Json(CreditTierResponse {
        score,
        tier,
        base_ltv: tier.base_ltv(),
        base_rate: tier.base_rate(),
        insurance_base_rate: tier.insurance_base_rate(),
    }))
}

async fn nft_risk(Json(body): Json<NftRiskBody>) -> ApiResult<NftRiskProfile> {
    Ok(Json(NftRiskProfile::new(body.risk_score)?))
}

async fn loan_conditions(Json(body): Json<ConditionsBody>) -> ApiResult<LoanConditions> {
    let (_, conditions) = resolve(body.credit_score, body.nft_risk_score)?;
    Ok(Json(conditions))
}

async fn loan_profiles(Json(body): Json<CollateralBody>) -> ApiResult<Vec<LoanProfileOption>> {
    let (_, conditions) = resolve(body.credit_score, body.nft_risk_score)?;
    let profiles = generate_loan_profiles(body.nft_value, &conditions, body.insurance_premium)?;
    Ok(Json(profiles.to_vec()))
}

async fn insurance_premium(Json(body): Json<InsuranceBody>) -> ApiResult<PremiumResponse> {
    let (_, conditions) = resolve(body.credit_score, body.nft_risk_score)?;
    let annual_premium =
        calculate_insurance_premium(body.loan_amount, conditions.credit_tier, conditions.nft_risk_class)?;
    Ok(Json(PremiumResponse { annual_premium }))
}

async fn insurance_options(Json(body): Json<InsuranceBody>) -> ApiResult<Vec<InsuranceOption>> {
    let (_, conditions) = resolve(body.credit_score, body.nft_risk_score)?;
    let options =
        calculate_insurance_options(body.loan_amount, conditions.credit_tier, conditions.nft_risk_class)?;
    Ok(Json(options.to_vec()))
}

async fn discount(Json(body): Json<CollateralBody>) -> ApiResult<DiscountSummary> {
    let (risk, conditions) = resolve(body.credit_score, body.nft_risk_score)?;
    let nft = NftCollateral::new(body.nft_value, risk)?;
    let summary = calculate_discount_summary(
        &nft,
        conditions.credit_tier,
        conditions.base_ltv,
        conditions.base_rate,
        body.insurance_premium.unwrap_or(0.0),
    )?;
    Ok(Json(summary))
}

async fn quote(State(state): State<AppState>, Json(request): Json<QuoteRequest>) -> ApiResult<LoanQuote> {
    Ok(Json(state.engine.quote(&request)?))
}

async fn originate_loan(State(state): State<AppState>, Json(body): Json<LoanTxBody>) -> ApiResult<TxReceipt> {
    let receipt = state
        .loans
        .originate(&body.borrower, body.amount, body.reference.as_deref())
        .await?;
    info!(tx_hash = %receipt.tx_hash, borrower = %receipt.from, "Loan originated");
    Ok(Json(receipt))
}

async fn repay_loan(State(state): State<AppState>, Json(body): Json<LoanTxBody>) -> ApiResult<TxReceipt> {
    let receipt = state
        .loans
        .repay(&body.borrower, body.amount, body.reference.as_deref())
        .await?;
    info!(tx_hash = %receipt.tx_hash, borrower = %receipt.from, "Loan repayment settled");
    Ok(Json(receipt))
}

async fn transaction(State(state): State<AppState>, Path(tx_hash): Path<String>) -> ApiResult<TxReceipt> {
    Ok(Json(state.transactions.status(&tx_hash).await?))
}

async fn account_transactions(State(state): State<AppState>, Path(address): Path<String>) -> Json<Vec<TxReceipt>> {
    Json(state.transactions.history(&address).await)
}

/// Build the REST router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy"})) }))
        .route(
            "/api/v1/version",
            get(|| async {
                Json(serde_json::json!({
                    "service": "blockbank-api",
                    "version": blockbank_common::VERSION,
                }))
            }),
        )
        // Pricing
        .route("/api/v1/credit-tier", post(credit_tier))
        .route("/api/v1/nft-risk", post(nft_risk))
        .route("/api/v1/loan-conditions", post(loan_conditions))
        .route("/api/v1/loan-profiles", post(loan_profiles))
        .route("/api/v1/insurance/premium", post(insurance_premium))
        .route("/api/v1/insurance/options", post(insurance_options))
        .route("/api/v1/discount", post(discount))
        .route("/api/v1/quote", post(quote))
        // Chain
        .route("/api/v1/loans", post(originate_loan))
        .route("/api/v1/loans/repay", post(repay_loan))
        .route("/api/v1/transactions/:tx_hash", get(transaction))
        .route("/api/v1/accounts/:address/transactions", get(account_transactions))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
