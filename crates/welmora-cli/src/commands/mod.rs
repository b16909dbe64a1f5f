pub mod compare;
pub mod emi;
pub mod sip;
pub mod swp;

use clap::Args;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;

use welmora_core::step_up::{StepDirection, StepFrequency, StepUpAdjustment, StepUpPolicy};

use crate::input;

/// Read a planner input from `--input` or piped stdin, if either is present.
pub fn read_input<T: DeserializeOwned>(
    path: &Option<String>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    input::read_plan(path.as_deref())
}

/// Parse a snake_case goal name through the core's serde names and aliases.
pub fn parse_goal<T: DeserializeOwned + Default>(
    goal: &Option<String>,
) -> Result<T, Box<dyn std::error::Error>> {
    match goal {
        Some(name) => serde_json::from_value(Value::String(name.replace('-', "_")))
            .map_err(|_| format!("unknown goal '{name}'").into()),
        None => Ok(T::default()),
    }
}

/// Step-up flags shared by `sip` and `swp`.
#[derive(Args)]
pub struct StepUpArgs {
    /// Step-up per period: a percentage, or an amount with --step-up-mode amount
    #[arg(long)]
    pub step_up: Option<Decimal>,

    /// How --step-up is applied: percentage or amount
    #[arg(long, default_value = "percentage")]
    pub step_up_mode: String,

    /// Decrease instead of increase at each step
    #[arg(long)]
    pub step_down: bool,

    /// Step period: yearly, half-yearly or monthly
    #[arg(long, default_value = "yearly")]
    pub step_frequency: String,
}

impl StepUpArgs {
    pub fn policy(&self) -> Result<Option<StepUpPolicy>, Box<dyn std::error::Error>> {
        let Some(value) = self.step_up else {
            return Ok(None);
        };
        let adjustment = match self.step_up_mode.as_str() {
            "percentage" | "pct" => StepUpAdjustment::Percentage(value),
            "amount" => StepUpAdjustment::Amount(value),
            other => return Err(format!("unknown --step-up-mode '{other}'").into()),
        };
        let direction = if self.step_down {
            StepDirection::Decrease
        } else {
            StepDirection::Increase
        };
        let frequency: StepFrequency =
            serde_json::from_value(Value::String(self.step_frequency.clone()))
                .map_err(|_| format!("unknown --step-frequency '{}'", self.step_frequency))?;
        Ok(Some(StepUpPolicy::new(adjustment, direction, frequency)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use welmora_core::depletion::planner::SwpGoal;

    #[test]
    fn test_parse_goal_accepts_kebab_case_and_default() {
        let goal: SwpGoal = parse_goal(&Some("withdrawal".into())).unwrap();
        assert_eq!(goal, SwpGoal::Withdrawal);
        let default: SwpGoal = parse_goal(&None).unwrap();
        assert_eq!(default, SwpGoal::Balance);
        assert!(parse_goal::<SwpGoal>(&Some("nonsense".into())).is_err());
    }

    #[test]
    fn test_step_up_flags_build_policy() {
        let args = StepUpArgs {
            step_up: Some(dec!(500)),
            step_up_mode: "amount".into(),
            step_down: true,
            step_frequency: "half-yearly".into(),
        };
        let policy = args.policy().unwrap().unwrap();
        assert_eq!(policy.adjustment, StepUpAdjustment::Amount(dec!(500)));
        assert_eq!(policy.direction, StepDirection::Decrease);
        assert_eq!(policy.frequency, StepFrequency::HalfYearly);
    }

    #[test]
    fn test_no_step_up_flag_means_none() {
        let args = StepUpArgs {
            step_up: None,
            step_up_mode: "percentage".into(),
            step_down: false,
            step_frequency: "yearly".into(),
        };
        assert!(args.policy().unwrap().is_none());
    }
}
