use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use welmora_core::amortization::planner::{self, LoanPlanInput};

use super::{parse_goal, read_input};

/// Arguments for the loan EMI calculator
#[derive(Args)]
pub struct EmiArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// What to solve for: installment, principal, rate or tenure
    #[arg(long)]
    pub goal: Option<String>,

    /// Loan amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (8.5 = 8.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Tenure in years
    #[arg(long)]
    pub tenure: Option<Decimal>,

    /// Affordable monthly installment (target for the other goals)
    #[arg(long, alias = "target")]
    pub installment: Option<Decimal>,
}

pub fn run_emi(args: EmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input: LoanPlanInput = match read_input(&args.input)? {
        Some(input) => input,
        None => LoanPlanInput {
            goal: parse_goal(&args.goal)?,
            principal: args.principal.unwrap_or_default(),
            annual_rate_pct: args.rate.unwrap_or_default(),
            tenure_years: args.tenure.unwrap_or_default(),
            installment: args.installment.unwrap_or_default(),
        },
    };

    let result = planner::plan_loan(&loan_input)?;
    Ok(serde_json::to_value(result)?)
}
