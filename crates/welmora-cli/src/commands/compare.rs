use clap::Args;
use serde_json::Value;

use welmora_core::comparison::{self, ComparisonInput};

use super::read_input;

/// Arguments for scenario comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON input file with `scenario_a` and `scenario_b`
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let compare_input: ComparisonInput = read_input(&args.input)?
        .ok_or("--input <file.json> or stdin required for compare")?;
    let result = comparison::compare_scenarios(&compare_input)?;
    Ok(serde_json::to_value(result)?)
}
