//! Side-by-side comparison of two plans of the same calculator and goal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::accumulation::planner::{plan_sip, SipPlanInput};
use crate::amortization::planner::{plan_loan, LoanPlanInput};
use crate::depletion::planner::{plan_swp, SwpPlanInput};
use crate::error::WelmoraError;
use crate::types::{with_metadata, ComputationOutput, Money, SimulationPoint};
use crate::WelmoraResult;

/// One scenario: a planner input tagged with the calculator it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "calculator", rename_all = "snake_case")]
pub enum PlanRequest {
    #[serde(alias = "emi")]
    Loan(LoanPlanInput),
    Sip(SipPlanInput),
    Swp(SwpPlanInput),
}

impl PlanRequest {
    fn calculator(&self) -> &'static str {
        match self {
            PlanRequest::Loan(_) => "loan",
            PlanRequest::Sip(_) => "sip",
            PlanRequest::Swp(_) => "swp",
        }
    }

    fn goal_name(&self) -> WelmoraResult<String> {
        let goal = match self {
            PlanRequest::Loan(p) => serde_json::to_value(p.goal)?,
            PlanRequest::Sip(p) => serde_json::to_value(p.goal)?,
            PlanRequest::Swp(p) => serde_json::to_value(p.goal)?,
        };
        Ok(goal.as_str().unwrap_or_default().to_string())
    }

    /// Run the planner and keep what a comparison needs.
    fn evaluate(&self) -> WelmoraResult<ScenarioOutcome> {
        let (solved_value, history, warnings) = match self {
            PlanRequest::Loan(p) => {
                let out = plan_loan(p)?;
                (out.result.solved_value, out.result.history, out.warnings)
            }
            PlanRequest::Sip(p) => {
                let out = plan_sip(p)?;
                (out.result.solved_value, out.result.history, out.warnings)
            }
            PlanRequest::Swp(p) => {
                let out = plan_swp(p)?;
                (out.result.solved_value, out.result.history, out.warnings)
            }
        };
        Ok(ScenarioOutcome {
            solved_value,
            history,
            warnings,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInput {
    pub scenario_a: PlanRequest,
    pub scenario_b: PlanRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub solved_value: Decimal,
    pub history: Vec<SimulationPoint>,
    pub warnings: Vec<String>,
}

/// One year of both balance series; a scenario that has already ended reads 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonPoint {
    pub year: u32,
    pub value_a: Money,
    pub value_b: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonOutput {
    pub calculator: String,
    pub goal: String,
    pub result_a: Decimal,
    pub result_b: Decimal,
    /// `result_b - result_a`.
    pub difference: Decimal,
    pub absolute_difference: Decimal,
    pub history: Vec<ComparisonPoint>,
}

/// Plan both scenarios and line their results and yearly balances up.
pub fn compare_scenarios(
    input: &ComparisonInput,
) -> WelmoraResult<ComputationOutput<ComparisonOutput>> {
    let start = Instant::now();

    let calculator = input.scenario_a.calculator();
    if calculator != input.scenario_b.calculator() {
        return Err(WelmoraError::invalid(
            "scenario_b.calculator",
            "Both scenarios must use the same calculator",
        ));
    }
    let goal = input.scenario_a.goal_name()?;
    if goal != input.scenario_b.goal_name()? {
        return Err(WelmoraError::invalid(
            "scenario_b.goal",
            "Both scenarios must solve for the same goal",
        ));
    }

    let a = input.scenario_a.evaluate()?;
    let b = input.scenario_b.evaluate()?;

    let mut warnings = Vec::new();
    warnings.extend(a.warnings.iter().map(|w| format!("Scenario A: {w}")));
    warnings.extend(b.warnings.iter().map(|w| format!("Scenario B: {w}")));

    let difference = b.solved_value - a.solved_value;
    let output = ComparisonOutput {
        calculator: calculator.to_string(),
        goal,
        result_a: a.solved_value,
        result_b: b.solved_value,
        difference,
        absolute_difference: difference.abs(),
        history: merge_histories(&a.history, &b.history),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Scenario comparison (independent plans, merged yearly balances)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Zip two yearly series by position, padding the shorter one with zeros.
pub fn merge_histories(a: &[SimulationPoint], b: &[SimulationPoint]) -> Vec<ComparisonPoint> {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| {
            let pa = a.get(i);
            let pb = b.get(i);
            ComparisonPoint {
                year: pa.or(pb).map(|p| p.year).unwrap_or(i as u32),
                value_a: pa.map(|p| p.primary_value).unwrap_or(Decimal::ZERO),
                value_b: pb.map(|p| p.primary_value).unwrap_or(Decimal::ZERO),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_merge_pads_shorter_history() {
        let a = vec![
            SimulationPoint::new(0, dec!(100)),
            SimulationPoint::new(1, dec!(50)),
        ];
        let b = vec![
            SimulationPoint::new(0, dec!(200)),
            SimulationPoint::new(1, dec!(150)),
            SimulationPoint::new(2, dec!(75)),
        ];
        let merged = merge_histories(&a, &b);
        assert_eq!(merged.len(), 3);
        assert_eq!(
            merged[2],
            ComparisonPoint {
                year: 2,
                value_a: Decimal::ZERO,
                value_b: dec!(75),
            }
        );
    }

    #[test]
    fn test_mismatched_calculators_rejected() {
        let json = r#"{
            "scenario_a": {"calculator": "loan", "principal": 100000, "annual_rate_pct": 10, "tenure_years": 5},
            "scenario_b": {"calculator": "sip", "monthly_contribution": 5000, "annual_rate_pct": 12, "tenure_years": 10}
        }"#;
        let input: ComparisonInput = serde_json::from_str(json).unwrap();
        assert!(compare_scenarios(&input).is_err());
    }
}
