use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::error::WelmoraError;
use crate::step_up::StepUpPolicy;
use crate::time_value::{
    checked_add, checked_mul, checked_sub, monthly_rate, round_unit, whole_months, MONTHS_PER_YEAR,
    MAX_TENURE_YEARS,
};
use crate::types::{Money, Rate, SimulationPoint, SimulationResult, Years};
use crate::WelmoraResult;

/// Simulate a systematic withdrawal plan month by month.
///
/// Each month the corpus first earns one month of interest, then the current
/// withdrawal is taken out. The returned `final_value` is signed: a negative
/// value means the corpus ran dry before the tenure ended. Yearly history
/// points are clamped at zero for charting.
pub fn simulate_depletion(
    corpus: Money,
    monthly_withdrawal: Money,
    annual_rate_pct: Rate,
    tenure_years: Years,
    step_up: Option<&StepUpPolicy>,
) -> WelmoraResult<SimulationResult> {
    let run = run_depletion(
        corpus,
        monthly_withdrawal,
        annual_rate_pct,
        tenure_years,
        step_up,
        OnOverflow::Fail,
    )?;

    Ok(SimulationResult {
        final_value: run.balance,
        aggregate_flow: run.withdrawn,
        benchmark_final_value: None,
        history: run.history,
    })
}

/// Signed final balance of a withdrawal plan, for use as a solver objective.
///
/// A balance that outgrows `Decimal` is pinned to `Decimal::MAX` or
/// `Decimal::MIN` following its sign, so the objective stays monotonic where
/// the corpus compounds away or an overdrawn balance runs off to minus
/// infinity.
pub fn final_balance(
    corpus: Money,
    monthly_withdrawal: Money,
    annual_rate_pct: Rate,
    tenure_years: Years,
    step_up: Option<&StepUpPolicy>,
) -> WelmoraResult<Money> {
    run_depletion(
        corpus,
        monthly_withdrawal,
        annual_rate_pct,
        tenure_years,
        step_up,
        OnOverflow::Saturate,
    )
    .map(|run| run.balance)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnOverflow {
    Fail,
    Saturate,
}

struct DepletionRun {
    balance: Money,
    withdrawn: Money,
    history: Vec<SimulationPoint>,
}

fn run_depletion(
    corpus: Money,
    monthly_withdrawal: Money,
    annual_rate_pct: Rate,
    tenure_years: Years,
    step_up: Option<&StepUpPolicy>,
    on_overflow: OnOverflow,
) -> WelmoraResult<DepletionRun> {
    if tenure_years > MAX_TENURE_YEARS {
        return Err(WelmoraError::invalid(
            "tenure_years",
            "Withdrawal plans are limited to 100 years",
        ));
    }
    if let Some(policy) = step_up {
        policy.validate()?;
    }

    let months = whole_months(tenure_years)?;
    let growth = Decimal::ONE + monthly_rate(annual_rate_pct);

    let mut balance = corpus;
    let mut withdrawal = monthly_withdrawal;
    let mut withdrawn = Decimal::ZERO;
    let mut depleted_at: Option<u32> = None;

    let mut history = Vec::with_capacity((months / MONTHS_PER_YEAR) as usize + 1);
    history.push(SimulationPoint::new(0, round_unit(balance)));

    for m in 1..=months {
        if let Some(policy) = step_up {
            if policy.is_adjustment_month(m) {
                withdrawal = policy.apply(withdrawal)?;
            }
        }

        let next = checked_mul(balance, growth, "SWP growth")
            .and_then(|grown| checked_sub(grown, withdrawal, "SWP balance"));
        balance = match next {
            Ok(value) => value,
            Err(WelmoraError::ArithmeticOverflow { .. }) if on_overflow == OnOverflow::Saturate => {
                // Growth and withdrawals only push further the same way.
                let pinned = if balance.is_sign_negative() || balance.is_zero() {
                    Decimal::MIN
                } else {
                    Decimal::MAX
                };
                trace!(month = m, %pinned, "SWP balance saturated");
                balance = pinned;
                break;
            }
            Err(e) => return Err(e),
        };
        withdrawn = checked_add(withdrawn, withdrawal, "SWP withdrawn")?;

        if depleted_at.is_none() && balance <= Decimal::ZERO {
            depleted_at = Some(m);
        }
        if m % MONTHS_PER_YEAR == 0 {
            history.push(SimulationPoint::new(
                m / MONTHS_PER_YEAR,
                round_unit(balance).max(Decimal::ZERO),
            ));
        }
    }

    debug!(months, final_value = %balance, %withdrawn, ?depleted_at, "SWP simulated");

    Ok(DepletionRun {
        balance,
        withdrawn,
        history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_zero_rate_linear_depletion() {
        let r = simulate_depletion(dec!(1000000), dec!(10000), Decimal::ZERO, dec!(5), None).unwrap();
        assert_eq!(r.final_value, dec!(400000));
        assert_eq!(r.aggregate_flow, dec!(600000));
        assert_eq!(r.history.len(), 6);
        assert_eq!(r.history[1].primary_value, dec!(880000));
    }

    #[test]
    fn test_overdrawn_corpus_is_signed_but_history_clamped() {
        let r = simulate_depletion(dec!(100000), dec!(10000), Decimal::ZERO, dec!(2), None).unwrap();
        assert_eq!(r.final_value, dec!(-140000));
        assert_eq!(r.history[2].primary_value, Decimal::ZERO);
        assert_eq!(r.history[1].primary_value, Decimal::ZERO);
    }

    #[test]
    fn test_growth_before_withdrawal() {
        // Withdrawing exactly the month's interest leaves the corpus intact.
        let r = simulate_depletion(dec!(100000), dec!(1000), dec!(12), dec!(1), None).unwrap();
        assert_eq!(r.final_value, dec!(100000));
        assert_eq!(r.aggregate_flow, dec!(12000));
    }

    #[test]
    fn test_points_have_no_secondary_series() {
        let r = simulate_depletion(dec!(500000), dec!(2000), dec!(8), dec!(1), None).unwrap();
        assert!(r.history.iter().all(|p| p.secondary_value.is_none()));
        assert!(r.benchmark_final_value.is_none());
    }

    #[test]
    fn test_tenure_cap_rejected() {
        assert!(simulate_depletion(dec!(1000), dec!(10), dec!(5), dec!(101), None).is_err());
    }

    #[test]
    fn test_final_balance_matches_simulation() {
        let sim = simulate_depletion(dec!(2500000), dec!(20000), dec!(7), dec!(12), None).unwrap();
        let balance = final_balance(dec!(2500000), dec!(20000), dec!(7), dec!(12), None).unwrap();
        assert_eq!(balance, sim.final_value);
    }

    #[test]
    fn test_final_balance_saturates_by_sign() {
        // 5% a month on an overdrawn balance runs off to minus infinity.
        assert!(simulate_depletion(dec!(1000000), dec!(100000), dec!(60), dec!(100), None).is_err());
        let drained = final_balance(dec!(1000000), dec!(100000), dec!(60), dec!(100), None).unwrap();
        assert_eq!(drained, Decimal::MIN);

        // The same rate on an untouched corpus runs off the other way.
        let grown = final_balance(dec!(1000000), Decimal::ZERO, dec!(60), dec!(100), None).unwrap();
        assert_eq!(grown, Decimal::MAX);
    }
}
