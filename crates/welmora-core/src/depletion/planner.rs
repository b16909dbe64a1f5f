use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::depletion::swp::{final_balance, simulate_depletion};
use crate::error::WelmoraError;
use crate::solver::{note_miss, SolverQuery};
use crate::step_up::StepUpPolicy;
use crate::time_value::{checked_mul, round_unit};
use crate::types::{with_metadata, ComputationOutput, Money, Rate, SimulationPoint, Years};
use crate::WelmoraResult;

const RATE_BRACKET: (Decimal, Decimal) = (dec!(0), dec!(100));
const TENURE_BRACKET: (Decimal, Decimal) = (dec!(0), dec!(100));

/// Every SWP solve drives the final balance to this value.
const DEPLETION_TARGET: Money = Decimal::ZERO;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwpGoal {
    /// Project the balance left at the end of the tenure.
    #[default]
    Balance,
    /// Largest withdrawal the corpus sustains for the full tenure.
    Withdrawal,
    /// Corpus needed to fund the withdrawals for the full tenure.
    Corpus,
    /// Return needed for the corpus to last the full tenure.
    Rate,
    /// How many years the corpus lasts.
    Tenure,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwpPlanInput {
    #[serde(default)]
    pub goal: SwpGoal,
    #[serde(default)]
    pub corpus: Money,
    #[serde(default)]
    pub monthly_withdrawal: Money,
    #[serde(default)]
    pub annual_rate_pct: Rate,
    #[serde(default)]
    pub tenure_years: Years,
    #[serde(default)]
    pub step_up: Option<StepUpPolicy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwpPlanOutput {
    pub goal: SwpGoal,
    pub solved_value: Decimal,
    pub corpus: Money,
    pub monthly_withdrawal: Money,
    pub annual_rate_pct: Rate,
    pub tenure_years: Years,
    /// Signed balance after the last month; negative once overdrawn.
    pub final_balance: Money,
    /// `final_balance` floored at zero, as shown to the user.
    pub projected_balance: Money,
    pub total_withdrawn: Money,
    pub depleted: bool,
    pub history: Vec<SimulationPoint>,
}

/// Resolve one SWP variable so the corpus runs out exactly at the end of the
/// tenure, or project the balance of a fully specified plan.
pub fn plan_swp(input: &SwpPlanInput) -> WelmoraResult<ComputationOutput<SwpPlanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let step_up = input.step_up.as_ref();
    let mut corpus = input.corpus;
    let mut withdrawal = input.monthly_withdrawal;
    let mut rate = input.annual_rate_pct;
    let mut tenure = input.tenure_years;

    let balance_of =
        |c: Decimal, w: Decimal, r: Decimal, t: Decimal| final_balance(c, w, r, t, step_up);

    let solved_value = match input.goal {
        SwpGoal::Balance => None,
        SwpGoal::Withdrawal => {
            let solution = SolverQuery::new(DEPLETION_TARGET, Decimal::ZERO, corpus)
                .run(|w| balance_of(corpus, w, rate, tenure))?;
            note_miss(&mut warnings, "withdrawal", &solution, DEPLETION_TARGET);
            withdrawal = solution.value;
            Some(withdrawal)
        }
        SwpGoal::Corpus => {
            // Twice the undiscounted withdrawals covers any non-negative rate.
            let upper = checked_mul(
                checked_mul(withdrawal, dec!(12), "corpus bracket")?,
                checked_mul(tenure, dec!(2), "corpus bracket")?,
                "corpus bracket",
            )?;
            let solution = SolverQuery::new(DEPLETION_TARGET, Decimal::ZERO, upper)
                .run(|c| balance_of(c, withdrawal, rate, tenure))?;
            note_miss(&mut warnings, "corpus", &solution, DEPLETION_TARGET);
            corpus = solution.value;
            Some(corpus)
        }
        SwpGoal::Rate => {
            let solution = SolverQuery::new(DEPLETION_TARGET, RATE_BRACKET.0, RATE_BRACKET.1)
                .run(|r| balance_of(corpus, withdrawal, r, tenure))?;
            note_miss(&mut warnings, "rate", &solution, DEPLETION_TARGET);
            rate = solution.value;
            Some(rate)
        }
        SwpGoal::Tenure => {
            let solution = SolverQuery::new(DEPLETION_TARGET, TENURE_BRACKET.0, TENURE_BRACKET.1)
                .run(|t| balance_of(corpus, withdrawal, rate, t))?;
            if solution.bracketed {
                note_miss(&mut warnings, "tenure", &solution, DEPLETION_TARGET);
            } else {
                warnings.push("Corpus outlasts the 100-year horizon".into());
            }
            tenure = solution.value;
            Some(tenure)
        }
    };

    let sim = simulate_depletion(corpus, withdrawal, rate, tenure, step_up)?;
    let projected_balance = sim.final_value.max(Decimal::ZERO);
    let depleted = round_unit(sim.final_value) < Decimal::ZERO;
    if depleted && input.goal == SwpGoal::Balance {
        warnings.push("Corpus is exhausted before the end of the tenure".into());
    }

    let output = SwpPlanOutput {
        goal: input.goal,
        solved_value: solved_value.unwrap_or(projected_balance),
        corpus,
        monthly_withdrawal: withdrawal,
        annual_rate_pct: rate,
        tenure_years: tenure,
        final_balance: sim.final_value,
        projected_balance,
        total_withdrawn: sim.aggregate_flow,
        depleted,
        history: sim.history,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "SWP depletion (monthly growth, then withdrawal)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_input(input: &SwpPlanInput) -> WelmoraResult<()> {
    if input.corpus < Decimal::ZERO {
        return Err(WelmoraError::invalid("corpus", "Corpus cannot be negative"));
    }
    if input.monthly_withdrawal < Decimal::ZERO {
        return Err(WelmoraError::invalid(
            "monthly_withdrawal",
            "Withdrawal cannot be negative",
        ));
    }
    if input.tenure_years < Decimal::ZERO {
        return Err(WelmoraError::invalid("tenure_years", "Tenure cannot be negative"));
    }
    match input.goal {
        SwpGoal::Withdrawal | SwpGoal::Rate | SwpGoal::Tenure if input.corpus <= Decimal::ZERO => {
            Err(WelmoraError::invalid("corpus", "Corpus must be > 0"))
        }
        SwpGoal::Corpus if input.monthly_withdrawal <= Decimal::ZERO => Err(WelmoraError::invalid(
            "monthly_withdrawal",
            "Withdrawal must be > 0",
        )),
        SwpGoal::Corpus if input.tenure_years <= Decimal::ZERO => {
            Err(WelmoraError::invalid("tenure_years", "Tenure must be > 0"))
        }
        _ => match &input.step_up {
            Some(policy) => policy.validate(),
            None => Ok(()),
        },
    }
}
