use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use crate::step_up::StepUpPolicy;
use crate::time_value::{
    checked_add, checked_mul, monthly_rate, round_unit, whole_months, MAX_TENURE_YEARS,
    MONTHS_PER_YEAR,
};
use crate::types::{Money, Rate, SimulationPoint, SimulationResult, Years};
use crate::WelmoraResult;

/// Fixed-deposit style reference rate run alongside every SIP, % p.a.
pub const DEFAULT_BENCHMARK_RATE: Rate = dec!(6);

/// Simulate a SIP month by month against the default 6% benchmark.
///
/// See [`simulate_accumulation_with_benchmark`].
pub fn simulate_accumulation(
    monthly_contribution: Money,
    initial_lumpsum: Money,
    annual_rate_pct: Rate,
    tenure_years: Years,
    step_up: Option<&StepUpPolicy>,
) -> WelmoraResult<SimulationResult> {
    simulate_accumulation_with_benchmark(
        monthly_contribution,
        initial_lumpsum,
        annual_rate_pct,
        tenure_years,
        step_up,
        DEFAULT_BENCHMARK_RATE,
    )
}

/// Simulate a SIP month by month.
///
/// Each month: apply any step-up due, add the contribution, then grow the
/// balance by one month of interest. Contributions therefore earn a full
/// month in the month they are made. The benchmark track receives the same
/// contributions but grows at `benchmark_rate_pct`.
///
/// Tenures above 100 years return a zeroed result with an empty history.
pub fn simulate_accumulation_with_benchmark(
    monthly_contribution: Money,
    initial_lumpsum: Money,
    annual_rate_pct: Rate,
    tenure_years: Years,
    step_up: Option<&StepUpPolicy>,
    benchmark_rate_pct: Rate,
) -> WelmoraResult<SimulationResult> {
    if tenure_years > MAX_TENURE_YEARS {
        warn!(%tenure_years, "SIP tenure above 100 years; returning zeroed result");
        return Ok(SimulationResult::zeroed());
    }
    if let Some(policy) = step_up {
        policy.validate()?;
    }

    let months = whole_months(tenure_years)?;
    let growth = Decimal::ONE + monthly_rate(annual_rate_pct);
    let benchmark_growth = Decimal::ONE + monthly_rate(benchmark_rate_pct);

    let mut balance = initial_lumpsum;
    let mut benchmark = initial_lumpsum;
    let mut invested = initial_lumpsum;
    let mut contribution = monthly_contribution;

    let mut history = Vec::with_capacity((months / MONTHS_PER_YEAR) as usize + 1);
    history.push(point(0, balance, invested, benchmark));

    for m in 1..=months {
        if let Some(policy) = step_up {
            if policy.is_adjustment_month(m) {
                contribution = policy.apply(contribution)?;
            }
        }

        balance = checked_add(balance, contribution, "SIP balance")?;
        benchmark = checked_add(benchmark, contribution, "SIP benchmark")?;
        invested = checked_add(invested, contribution, "SIP invested")?;

        balance = checked_mul(balance, growth, "SIP growth")?;
        benchmark = checked_mul(benchmark, benchmark_growth, "SIP benchmark growth")?;

        if m % MONTHS_PER_YEAR == 0 {
            history.push(point(m / MONTHS_PER_YEAR, balance, invested, benchmark));
        }
    }

    debug!(months, final_value = %balance, %invested, "SIP simulated");

    Ok(SimulationResult {
        final_value: balance,
        aggregate_flow: invested,
        benchmark_final_value: Some(benchmark),
        history,
    })
}

fn point(year: u32, balance: Money, invested: Money, benchmark: Money) -> SimulationPoint {
    SimulationPoint::new(year, round_unit(balance))
        .with_secondary(round_unit(invested))
        .with_benchmark(round_unit(benchmark))
}
