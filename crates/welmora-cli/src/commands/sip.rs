use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use welmora_core::accumulation::planner::{self, SipPlanInput};

use super::{parse_goal, read_input, StepUpArgs};

/// Arguments for the SIP calculator
#[derive(Args)]
pub struct SipArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// What to solve for: maturity, contribution, lumpsum, rate or tenure
    #[arg(long)]
    pub goal: Option<String>,

    /// Monthly contribution
    #[arg(long, alias = "sip")]
    pub contribution: Option<Decimal>,

    /// One-time investment at the start
    #[arg(long)]
    pub lumpsum: Option<Decimal>,

    /// Expected annual return in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Investment horizon in years
    #[arg(long)]
    pub tenure: Option<Decimal>,

    /// Target maturity for every goal but `maturity`
    #[arg(long)]
    pub target: Option<Decimal>,

    /// Annual rate of the benchmark track in percent (default 6)
    #[arg(long)]
    pub benchmark_rate: Option<Decimal>,

    #[command(flatten)]
    pub step_up: StepUpArgs,
}

pub fn run_sip(args: SipArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sip_input: SipPlanInput = match read_input(&args.input)? {
        Some(input) => input,
        None => SipPlanInput {
            goal: parse_goal(&args.goal)?,
            monthly_contribution: args.contribution.unwrap_or_default(),
            initial_lumpsum: args.lumpsum.unwrap_or_default(),
            annual_rate_pct: args.rate.unwrap_or_default(),
            tenure_years: args.tenure.unwrap_or_default(),
            target_maturity: args.target.unwrap_or_default(),
            step_up: args.step_up.policy()?,
            benchmark_rate_pct: args.benchmark_rate,
        },
    };

    let result = planner::plan_sip(&sip_input)?;
    Ok(serde_json::to_value(result)?)
}
