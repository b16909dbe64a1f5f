//! Periodic step-up (or step-down) of a recurring SIP contribution or SWP
//! withdrawal.
//!
//! A disabled step-up is modelled as `Option::None` at the call site rather
//! than an `enabled` flag, so a policy value is always an active policy.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::WelmoraError;
use crate::time_value::{checked_add, checked_mul};
use crate::types::Money;
use crate::WelmoraResult;

/// How the recurring amount changes at each boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum StepUpAdjustment {
    /// Scale by `value` percent (10 = 10%).
    Percentage(Decimal),
    /// Shift by a fixed amount of money.
    Amount(Money),
}

impl StepUpAdjustment {
    pub fn value(&self) -> Decimal {
        match self {
            StepUpAdjustment::Percentage(v) | StepUpAdjustment::Amount(v) => *v,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepDirection {
    #[default]
    Increase,
    Decrease,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepFrequency {
    #[default]
    Yearly,
    #[serde(alias = "half-yearly", alias = "halfYearly")]
    HalfYearly,
    Monthly,
}

impl StepFrequency {
    /// Months between two adjustments.
    pub fn period_months(self) -> u32 {
        match self {
            StepFrequency::Yearly => 12,
            StepFrequency::HalfYearly => 6,
            StepFrequency::Monthly => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepUpPolicy {
    pub adjustment: StepUpAdjustment,
    #[serde(default)]
    pub direction: StepDirection,
    #[serde(default)]
    pub frequency: StepFrequency,
}

impl StepUpPolicy {
    pub fn new(
        adjustment: StepUpAdjustment,
        direction: StepDirection,
        frequency: StepFrequency,
    ) -> Self {
        StepUpPolicy {
            adjustment,
            direction,
            frequency,
        }
    }

    /// Yearly percentage increase, the calculators' default step-up.
    pub fn yearly_percentage(pct: Decimal) -> Self {
        StepUpPolicy::new(
            StepUpAdjustment::Percentage(pct),
            StepDirection::Increase,
            StepFrequency::Yearly,
        )
    }

    pub fn validate(&self) -> WelmoraResult<()> {
        if self.adjustment.value() < Decimal::ZERO {
            return Err(WelmoraError::invalid(
                "step_up.value",
                "Step-up value must be >= 0; use direction to decrease",
            ));
        }
        Ok(())
    }

    /// True when month `m` (1-based) opens a new step-up period.
    /// The first month never adjusts.
    pub fn is_adjustment_month(&self, month: u32) -> bool {
        month > 1 && (month - 1) % self.frequency.period_months() == 0
    }

    /// Apply one adjustment to the recurring amount. Decreases never go below zero.
    pub fn apply(&self, amount: Money) -> WelmoraResult<Money> {
        let adjusted = match (self.adjustment, self.direction) {
            (StepUpAdjustment::Percentage(pct), StepDirection::Increase) => {
                checked_mul(amount, Decimal::ONE + pct / dec!(100), "step-up amount")?
            }
            (StepUpAdjustment::Percentage(pct), StepDirection::Decrease) => {
                checked_mul(amount, Decimal::ONE - pct / dec!(100), "step-down amount")?
            }
            (StepUpAdjustment::Amount(value), StepDirection::Increase) => {
                checked_add(amount, value, "step-up amount")?
            }
            (StepUpAdjustment::Amount(value), StepDirection::Decrease) => amount - value,
        };

        if self.direction == StepDirection::Decrease {
            Ok(adjusted.max(Decimal::ZERO))
        } else {
            Ok(adjusted)
        }
    }
}
