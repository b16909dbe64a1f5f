use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::WelmoraError;
use crate::time_value::{
    checked_add, checked_mul, checked_sub, compound, monthly_rate, round_unit, tenure_months,
    MONTHS_PER_YEAR,
};
use crate::types::{Money, Rate, SimulationPoint, Years};
use crate::WelmoraResult;

/// Longest loan the closed form is evaluated for; keeps (1+r)^n finite.
pub const MAX_INSTALLMENT_MONTHS: Decimal = dec!(1200);

/// Year-by-year amortization of a fixed-installment loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    /// `primary_value` is the outstanding balance (floored at 0),
    /// `secondary_value` the cumulative interest paid, both rounded.
    pub history: Vec<SimulationPoint>,
    pub total_interest: Money,
}

/// Equated monthly installment for a loan.
///
/// `EMI = P * r * (1+r)^n / ((1+r)^n - 1)` with `r` the monthly rate and
/// `n = tenure_years * 12`. At a zero rate this degenerates to `P / n`.
pub fn calculate_installment(
    principal: Money,
    annual_rate_pct: Rate,
    tenure_years: Years,
) -> WelmoraResult<Money> {
    validate_loan(principal, tenure_years)?;

    let r = monthly_rate(annual_rate_pct);
    let n = tenure_months(tenure_years)?;

    if r.is_zero() {
        return Ok(principal / n);
    }

    let factor = compound(r, n)?;
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(WelmoraError::DivisionByZero {
            context: "EMI annuity factor".into(),
        });
    }

    // factor / (factor - 1) stays near 1, so scale the principal last.
    let ratio = factor / denominator;
    let installment = checked_mul(checked_mul(principal, r, "EMI")?, ratio, "EMI")?;
    Ok(installment)
}

/// Walk a loan month by month at a given installment and sample it yearly.
///
/// Emits a point for year 0 (the starting balance) and one per year up to
/// `ceil(tenure_years)`. Once the balance reaches zero the monthly loop stops
/// and the remaining points stay at zero. An installment below the monthly
/// interest grows the balance instead; if it outgrows `Decimal` the schedule
/// fails with `ArithmeticOverflow`.
pub fn calculate_schedule(
    principal: Money,
    annual_rate_pct: Rate,
    tenure_years: Years,
    installment: Money,
) -> WelmoraResult<AmortizationSchedule> {
    validate_loan(principal, tenure_years)?;
    if installment <= Decimal::ZERO {
        return Err(WelmoraError::invalid("installment", "Installment must be > 0"));
    }

    let r = monthly_rate(annual_rate_pct);
    let years: u32 = tenure_years
        .ceil()
        .to_u32()
        .ok_or_else(|| WelmoraError::invalid("tenure_years", "Tenure is too long to schedule"))?;

    let mut balance = principal;
    let mut total_interest = Decimal::ZERO;
    let mut history = Vec::with_capacity(years as usize + 1);

    for year in 0..=years {
        history.push(
            SimulationPoint::new(year, round_unit(balance.max(Decimal::ZERO)))
                .with_secondary(round_unit(total_interest)),
        );
        if year == years {
            break;
        }

        for _ in 0..MONTHS_PER_YEAR {
            if balance <= Decimal::ZERO {
                break;
            }
            let interest = checked_mul(balance, r, "loan interest")?;
            let principal_paid = checked_sub(installment, interest, "loan principal repaid")?;
            balance = checked_sub(balance, principal_paid, "loan balance")?;
            total_interest = checked_add(total_interest, interest, "total interest")?;
        }
    }

    debug!(%principal, years, %total_interest, "amortization schedule built");

    Ok(AmortizationSchedule {
        history,
        total_interest,
    })
}

fn validate_loan(principal: Money, tenure_years: Years) -> WelmoraResult<()> {
    if principal <= Decimal::ZERO {
        return Err(WelmoraError::invalid("principal", "Principal must be > 0"));
    }
    if tenure_years <= Decimal::ZERO {
        return Err(WelmoraError::invalid("tenure_years", "Tenure must be > 0"));
    }
    if tenure_months(tenure_years)? > MAX_INSTALLMENT_MONTHS {
        return Err(WelmoraError::invalid(
            "tenure_years",
            "Tenure must not exceed 1200 months",
        ));
    }
    Ok(())
}
