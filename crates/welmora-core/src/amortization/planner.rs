use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::emi::{calculate_installment, calculate_schedule};
use crate::error::WelmoraError;
use crate::solver::{note_miss, SolverQuery};
use crate::types::{with_metadata, ComputationOutput, Money, Rate, SimulationPoint, Years};
use crate::WelmoraResult;

/// Search range for the rate goal, % p.a.
const RATE_BRACKET: (Decimal, Decimal) = (dec!(0.1), dec!(50));

/// Search range for the tenure goal, years.
const TENURE_BRACKET: (Decimal, Decimal) = (dec!(1), dec!(50));

/// Which loan variable the planner resolves; the other three are inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanGoal {
    #[default]
    #[serde(alias = "emi")]
    Installment,
    #[serde(alias = "amount")]
    Principal,
    Rate,
    Tenure,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanPlanInput {
    #[serde(default)]
    pub goal: LoanGoal,
    #[serde(default)]
    pub principal: Money,
    #[serde(default)]
    pub annual_rate_pct: Rate,
    #[serde(default)]
    pub tenure_years: Years,
    /// Affordable monthly installment; required for every goal but `Installment`.
    #[serde(default)]
    pub installment: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanPlanOutput {
    pub goal: LoanGoal,
    pub solved_value: Decimal,
    pub principal: Money,
    pub annual_rate_pct: Rate,
    pub tenure_years: Years,
    pub installment: Money,
    pub total_interest: Money,
    pub total_payment: Money,
    pub history: Vec<SimulationPoint>,
}

/// Resolve one loan variable from the other three, then build its schedule.
pub fn plan_loan(input: &LoanPlanInput) -> WelmoraResult<ComputationOutput<LoanPlanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let mut principal = input.principal;
    let mut rate = input.annual_rate_pct;
    let mut tenure = input.tenure_years;
    let mut installment = input.installment;

    let solved_value = match input.goal {
        LoanGoal::Installment => {
            installment = calculate_installment(principal, rate, tenure)?;
            installment
        }
        LoanGoal::Principal => {
            // EMI is linear in principal: scale the installment of a unit loan.
            let per_unit = calculate_installment(Decimal::ONE, rate, tenure)?;
            principal = input.installment / per_unit;
            principal
        }
        LoanGoal::Rate => {
            let solution = SolverQuery::new(installment, RATE_BRACKET.0, RATE_BRACKET.1)
                .run(|r| calculate_installment(principal, r, tenure))?;
            note_miss(&mut warnings, "rate", &solution, installment);
            rate = solution.value;
            rate
        }
        LoanGoal::Tenure => {
            let solution = SolverQuery::new(installment, TENURE_BRACKET.0, TENURE_BRACKET.1)
                .run(|t| calculate_installment(principal, rate, t))?;
            note_miss(&mut warnings, "tenure", &solution, installment);
            tenure = solution.value;
            tenure
        }
    };

    let schedule = calculate_schedule(principal, rate, tenure, installment)?;
    let total_payment = installment * tenure * dec!(12);

    let output = LoanPlanOutput {
        goal: input.goal,
        solved_value,
        principal,
        annual_rate_pct: rate,
        tenure_years: tenure,
        installment,
        total_interest: schedule.total_interest,
        total_payment,
        history: schedule.history,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Loan EMI (fixed-installment annuity, monthly amortization)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_input(input: &LoanPlanInput) -> WelmoraResult<()> {
    if input.goal != LoanGoal::Principal && input.principal <= Decimal::ZERO {
        return Err(WelmoraError::invalid("principal", "Principal must be > 0"));
    }
    if input.goal != LoanGoal::Tenure && input.tenure_years <= Decimal::ZERO {
        return Err(WelmoraError::invalid("tenure_years", "Tenure must be > 0"));
    }
    if input.goal != LoanGoal::Installment && input.installment <= Decimal::ZERO {
        return Err(WelmoraError::invalid(
            "installment",
            "Target installment must be > 0",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base_input(goal: LoanGoal) -> LoanPlanInput {
        LoanPlanInput {
            goal,
            principal: dec!(5000000),
            annual_rate_pct: dec!(8.5),
            tenure_years: dec!(20),
            installment: dec!(43391),
        }
    }

    #[test]
    fn test_installment_goal() {
        let out = plan_loan(&base_input(LoanGoal::Installment)).unwrap().result;
        assert!((out.installment - dec!(43391)).abs() < dec!(1));
        assert_eq!(out.history.len(), 21);
        assert!(out.total_interest > out.principal);
    }

    #[test]
    fn test_principal_goal_inverts_installment() {
        let out = plan_loan(&base_input(LoanGoal::Principal)).unwrap().result;
        assert!((out.principal - dec!(5000000)).abs() < dec!(200), "got {}", out.principal);
    }

    #[test]
    fn test_rate_goal() {
        let out = plan_loan(&base_input(LoanGoal::Rate)).unwrap();
        assert!((out.result.annual_rate_pct - dec!(8.5)).abs() < dec!(0.01));
        assert!(out.warnings.is_empty(), "{:?}", out.warnings);
    }

    #[test]
    fn test_tenure_goal() {
        let out = plan_loan(&base_input(LoanGoal::Tenure)).unwrap().result;
        assert!((out.tenure_years - dec!(20)).abs() < dec!(0.05), "got {}", out.tenure_years);
    }

    #[test]
    fn test_unreachable_rate_warns() {
        let mut input = base_input(LoanGoal::Rate);
        // Even 50% p.a. cannot make the EMI this large.
        input.installment = dec!(10000000);
        let out = plan_loan(&input).unwrap();
        assert!(!out.warnings.is_empty());
    }

    #[test]
    fn test_missing_target_rejected() {
        let mut input = base_input(LoanGoal::Rate);
        input.installment = Decimal::ZERO;
        assert!(plan_loan(&input).is_err());
    }
}
