use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use welmora_core::accumulation::sip::{simulate_accumulation_with_benchmark, DEFAULT_BENCHMARK_RATE};
use welmora_core::amortization::emi::{self, AmortizationSchedule};
use welmora_core::depletion::swp::simulate_depletion as run_depletion;
use welmora_core::step_up::StepUpPolicy;
use welmora_core::{Money, Rate, Years};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse<'a, T: Deserialize<'a>>(input_json: &'a str) -> NapiResult<T> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

fn render<T: Serialize>(output: &T) -> NapiResult<String> {
    serde_json::to_string(output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Raw engines
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct LoanRequest {
    principal: Money,
    annual_rate_pct: Rate,
    tenure_years: Years,
    /// Installment to amortize at; the computed EMI when omitted.
    #[serde(default)]
    installment: Option<Money>,
}

#[derive(Serialize)]
struct InstallmentResponse {
    installment: Money,
}

#[derive(Deserialize)]
struct AccumulationRequest {
    monthly_contribution: Money,
    #[serde(default)]
    initial_lumpsum: Money,
    annual_rate_pct: Rate,
    tenure_years: Years,
    #[serde(default)]
    step_up: Option<StepUpPolicy>,
    #[serde(default)]
    benchmark_rate_pct: Option<Rate>,
}

#[derive(Deserialize)]
struct DepletionRequest {
    corpus: Money,
    monthly_withdrawal: Money,
    annual_rate_pct: Rate,
    tenure_years: Years,
    #[serde(default)]
    step_up: Option<StepUpPolicy>,
}

#[napi]
pub fn calculate_installment(input_json: String) -> NapiResult<String> {
    let req: LoanRequest = parse(&input_json)?;
    let installment = emi::calculate_installment(req.principal, req.annual_rate_pct, req.tenure_years)
        .map_err(to_napi_error)?;
    render(&InstallmentResponse { installment })
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let req: LoanRequest = parse(&input_json)?;
    let installment: Decimal = match req.installment {
        Some(i) => i,
        None => emi::calculate_installment(req.principal, req.annual_rate_pct, req.tenure_years)
            .map_err(to_napi_error)?,
    };
    let schedule: AmortizationSchedule =
        emi::calculate_schedule(req.principal, req.annual_rate_pct, req.tenure_years, installment)
            .map_err(to_napi_error)?;
    render(&schedule)
}

#[napi]
pub fn simulate_accumulation(input_json: String) -> NapiResult<String> {
    let req: AccumulationRequest = parse(&input_json)?;
    let output = simulate_accumulation_with_benchmark(
        req.monthly_contribution,
        req.initial_lumpsum,
        req.annual_rate_pct,
        req.tenure_years,
        req.step_up.as_ref(),
        req.benchmark_rate_pct.unwrap_or(DEFAULT_BENCHMARK_RATE),
    )
    .map_err(to_napi_error)?;
    render(&output)
}

#[napi]
pub fn simulate_depletion(input_json: String) -> NapiResult<String> {
    let req: DepletionRequest = parse(&input_json)?;
    let output = run_depletion(
        req.corpus,
        req.monthly_withdrawal,
        req.annual_rate_pct,
        req.tenure_years,
        req.step_up.as_ref(),
    )
    .map_err(to_napi_error)?;
    render(&output)
}

// ---------------------------------------------------------------------------
// Goal planners
// ---------------------------------------------------------------------------

#[napi]
pub fn plan_loan(input_json: String) -> NapiResult<String> {
    let input: welmora_core::amortization::planner::LoanPlanInput = parse(&input_json)?;
    let output = welmora_core::amortization::planner::plan_loan(&input).map_err(to_napi_error)?;
    render(&output)
}

#[napi]
pub fn plan_sip(input_json: String) -> NapiResult<String> {
    let input: welmora_core::accumulation::planner::SipPlanInput = parse(&input_json)?;
    let output = welmora_core::accumulation::planner::plan_sip(&input).map_err(to_napi_error)?;
    render(&output)
}

#[napi]
pub fn plan_swp(input_json: String) -> NapiResult<String> {
    let input: welmora_core::depletion::planner::SwpPlanInput = parse(&input_json)?;
    let output = welmora_core::depletion::planner::plan_swp(&input).map_err(to_napi_error)?;
    render(&output)
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_scenarios(input_json: String) -> NapiResult<String> {
    let input: welmora_core::comparison::ComparisonInput = parse(&input_json)?;
    let output = welmora_core::comparison::compare_scenarios(&input).map_err(to_napi_error)?;
    render(&output)
}
