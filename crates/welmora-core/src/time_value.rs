use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::error::WelmoraError;
use crate::types::{Money, Rate, Years};
use crate::WelmoraResult;

pub const MONTHS_PER_YEAR: u32 = 12;

/// Longest tenure any simulator will run, in years.
pub const MAX_TENURE_YEARS: Years = dec!(100);

/// Convert an annual percentage into a monthly fraction: 12 (% p.a.) -> 0.01.
pub fn monthly_rate(annual_rate_pct: Rate) -> Rate {
    annual_rate_pct / dec!(12) / dec!(100)
}

/// Exact month count for a tenure, fractional tenures included.
pub fn tenure_months(tenure_years: Years) -> WelmoraResult<Decimal> {
    checked_mul(tenure_years, dec!(12), "tenure in months")
}

/// Whole months a simulator runs for a tenure: `floor(years * 12)`.
pub fn whole_months(tenure_years: Years) -> WelmoraResult<u32> {
    if tenure_years < Decimal::ZERO {
        return Err(WelmoraError::invalid(
            "tenure_years",
            "Tenure cannot be negative",
        ));
    }
    tenure_months(tenure_years)?
        .floor()
        .to_u32()
        .ok_or_else(|| WelmoraError::invalid("tenure_years", "Tenure is too long to simulate"))
}

/// Compute (1 + r)^n for a monthly rate `r` and a possibly fractional `n`.
///
/// The whole part is built by repeated multiplication; only the fractional
/// remainder goes through `powd`.
pub fn compound(rate: Rate, periods: Decimal) -> WelmoraResult<Decimal> {
    if periods < Decimal::ZERO {
        return Err(WelmoraError::invalid(
            "periods",
            "Number of periods must be >= 0",
        ));
    }

    let base = Decimal::ONE + rate;
    let whole = periods.trunc();
    let n = whole
        .to_u32()
        .ok_or_else(|| WelmoraError::overflow("compound period count"))?;

    let mut factor = Decimal::ONE;
    for _ in 0..n {
        factor = checked_mul(factor, base, "compound factor")?;
    }

    let fraction = periods - whole;
    if !fraction.is_zero() {
        if base <= Decimal::ZERO {
            return Err(WelmoraError::invalid(
                "rate",
                "Fractional periods require a monthly growth factor above zero",
            ));
        }
        let partial = base
            .checked_powd(fraction)
            .ok_or_else(|| WelmoraError::overflow("fractional compound factor"))?;
        factor = checked_mul(factor, partial, "compound factor")?;
    }

    Ok(factor)
}

/// Round a balance to the nearest whole unit for charting.
pub fn round_unit(value: Money) -> Money {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

pub(crate) fn checked_mul(a: Decimal, b: Decimal, context: &str) -> WelmoraResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| WelmoraError::overflow(context))
}

pub(crate) fn checked_add(a: Decimal, b: Decimal, context: &str) -> WelmoraResult<Decimal> {
    a.checked_add(b).ok_or_else(|| WelmoraError::overflow(context))
}

pub(crate) fn checked_sub(a: Decimal, b: Decimal, context: &str) -> WelmoraResult<Decimal> {
    a.checked_sub(b).ok_or_else(|| WelmoraError::overflow(context))
}
