use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use welmora_core::depletion::planner::{self, SwpPlanInput};

use super::{parse_goal, read_input, StepUpArgs};

/// Arguments for the SWP calculator
#[derive(Args)]
pub struct SwpArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// What to solve for: balance, withdrawal, corpus, rate or tenure
    #[arg(long)]
    pub goal: Option<String>,

    /// Starting corpus
    #[arg(long)]
    pub corpus: Option<Decimal>,

    /// Monthly withdrawal
    #[arg(long)]
    pub withdrawal: Option<Decimal>,

    /// Expected annual return in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Withdrawal horizon in years
    #[arg(long)]
    pub tenure: Option<Decimal>,

    #[command(flatten)]
    pub step_up: StepUpArgs,
}

pub fn run_swp(args: SwpArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let swp_input: SwpPlanInput = match read_input(&args.input)? {
        Some(input) => input,
        None => SwpPlanInput {
            goal: parse_goal(&args.goal)?,
            corpus: args.corpus.unwrap_or_default(),
            monthly_withdrawal: args.withdrawal.unwrap_or_default(),
            annual_rate_pct: args.rate.unwrap_or_default(),
            tenure_years: args.tenure.unwrap_or_default(),
            step_up: args.step_up.policy()?,
        },
    };

    let result = planner::plan_swp(&swp_input)?;
    Ok(serde_json::to_value(result)?)
}
