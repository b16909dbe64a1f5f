use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::accumulation::sip::{simulate_accumulation_with_benchmark, DEFAULT_BENCHMARK_RATE};
use crate::error::WelmoraError;
use crate::solver::{note_miss, saturate_overflow, SolverQuery};
use crate::step_up::StepUpPolicy;
use crate::types::{with_metadata, ComputationOutput, Money, Rate, SimulationPoint, Years};
use crate::WelmoraResult;

const RATE_BRACKET: (Decimal, Decimal) = (dec!(0), dec!(100));
const TENURE_BRACKET: (Decimal, Decimal) = (dec!(0), dec!(100));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SipGoal {
    #[default]
    Maturity,
    #[serde(alias = "sip")]
    Contribution,
    Lumpsum,
    Rate,
    Tenure,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipPlanInput {
    #[serde(default)]
    pub goal: SipGoal,
    #[serde(default)]
    pub monthly_contribution: Money,
    #[serde(default)]
    pub initial_lumpsum: Money,
    #[serde(default)]
    pub annual_rate_pct: Rate,
    #[serde(default)]
    pub tenure_years: Years,
    /// Desired maturity; required for every goal but `Maturity`.
    #[serde(default)]
    pub target_maturity: Money,
    #[serde(default)]
    pub step_up: Option<StepUpPolicy>,
    /// Reference rate for the benchmark track, % p.a. (6 when omitted).
    #[serde(default)]
    pub benchmark_rate_pct: Option<Rate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipPlanOutput {
    pub goal: SipGoal,
    pub solved_value: Decimal,
    pub monthly_contribution: Money,
    pub initial_lumpsum: Money,
    pub annual_rate_pct: Rate,
    pub tenure_years: Years,
    pub maturity: Money,
    pub invested: Money,
    /// `maturity - invested`; negative when the rate loses money.
    pub returns: Money,
    pub benchmark_maturity: Option<Money>,
    pub history: Vec<SimulationPoint>,
}

/// Resolve one SIP variable so the plan reaches the target maturity, or
/// project the maturity of a fully specified plan.
pub fn plan_sip(input: &SipPlanInput) -> WelmoraResult<ComputationOutput<SipPlanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let step_up = input.step_up.as_ref();
    let benchmark = input.benchmark_rate_pct.unwrap_or(DEFAULT_BENCHMARK_RATE);
    let target = input.target_maturity;

    let mut contribution = input.monthly_contribution;
    let mut lumpsum = input.initial_lumpsum;
    let mut rate = input.annual_rate_pct;
    let mut tenure = input.tenure_years;

    let maturity_of = |c: Decimal, l: Decimal, r: Decimal, t: Decimal| {
        saturate_overflow(
            simulate_accumulation_with_benchmark(c, l, r, t, step_up, benchmark).map(|s| s.final_value),
        )
    };

    let solved_value = match input.goal {
        SipGoal::Maturity => None,
        SipGoal::Contribution => {
            let solution = SolverQuery::new(target, Decimal::ZERO, target)
                .run(|c| maturity_of(c, lumpsum, rate, tenure))?;
            note_miss(&mut warnings, "monthly contribution", &solution, target);
            contribution = solution.value;
            Some(contribution)
        }
        SipGoal::Lumpsum => {
            let solution = SolverQuery::new(target, Decimal::ZERO, target)
                .run(|l| maturity_of(contribution, l, rate, tenure))?;
            note_miss(&mut warnings, "lumpsum", &solution, target);
            lumpsum = solution.value;
            Some(lumpsum)
        }
        SipGoal::Rate => {
            let solution = SolverQuery::new(target, RATE_BRACKET.0, RATE_BRACKET.1)
                .run(|r| maturity_of(contribution, lumpsum, r, tenure))?;
            note_miss(&mut warnings, "rate", &solution, target);
            rate = solution.value;
            Some(rate)
        }
        SipGoal::Tenure => {
            let solution = SolverQuery::new(target, TENURE_BRACKET.0, TENURE_BRACKET.1)
                .run(|t| maturity_of(contribution, lumpsum, rate, t))?;
            note_miss(&mut warnings, "tenure", &solution, target);
            tenure = solution.value;
            Some(tenure)
        }
    };

    let sim =
        simulate_accumulation_with_benchmark(contribution, lumpsum, rate, tenure, step_up, benchmark)?;
    let solved_value = solved_value.unwrap_or(sim.final_value);

    if sim.final_value < sim.aggregate_flow {
        warnings.push("Projected maturity is below the amount invested".into());
    }

    let output = SipPlanOutput {
        goal: input.goal,
        solved_value,
        monthly_contribution: contribution,
        initial_lumpsum: lumpsum,
        annual_rate_pct: rate,
        tenure_years: tenure,
        maturity: sim.final_value,
        invested: sim.aggregate_flow,
        returns: sim.final_value - sim.aggregate_flow,
        benchmark_maturity: sim.benchmark_final_value,
        history: sim.history,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "SIP accumulation (monthly contribution, then monthly compounding)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_input(input: &SipPlanInput) -> WelmoraResult<()> {
    if input.monthly_contribution < Decimal::ZERO {
        return Err(WelmoraError::invalid(
            "monthly_contribution",
            "Contribution cannot be negative",
        ));
    }
    if input.initial_lumpsum < Decimal::ZERO {
        return Err(WelmoraError::invalid("initial_lumpsum", "Lumpsum cannot be negative"));
    }
    if input.tenure_years < Decimal::ZERO {
        return Err(WelmoraError::invalid("tenure_years", "Tenure cannot be negative"));
    }
    if input.goal != SipGoal::Maturity && input.target_maturity <= Decimal::ZERO {
        return Err(WelmoraError::invalid(
            "target_maturity",
            "Target maturity must be > 0",
        ));
    }
    if let Some(policy) = &input.step_up {
        policy.validate()?;
    }
    Ok(())
}
