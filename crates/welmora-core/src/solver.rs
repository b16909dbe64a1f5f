//! Bisection inversion of any monotonic scalar objective.
//!
//! Every calculator goal ("what SIP reaches 1 Cr", "what withdrawal drains
//! the corpus exactly") is answered by bracketing the unknown input and
//! halving the bracket until the objective meets the target.
//!
//! [`solve`] keeps the historical contract: it always returns a number, even
//! when the bracket is not monotonic or does not contain the target. Use
//! [`SolverQuery::run`] to get a [`Solution`] report, or [`solve_strict`] to
//! turn a miss into an error.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::WelmoraError;
use crate::WelmoraResult;

/// Default bracket width at which the search stops.
pub const DEFAULT_TOLERANCE: Decimal = dec!(0.01);

/// Hard cap on bisection steps.
pub const MAX_ITERATIONS: u32 = 100;

/// Early exit once |f(mid) - target| / max(target, 1) falls below this.
const RELATIVE_ERROR_THRESHOLD: Decimal = dec!(0.0001);

/// One inversion request: find x in `[lower_bound, upper_bound]` with
/// `objective(x) ≈ target`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverQuery {
    pub target: Decimal,
    pub lower_bound: Decimal,
    pub upper_bound: Decimal,
    pub tolerance: Decimal,
}

/// What a bisection run produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Midpoint of the final bracket (or the early-exit midpoint).
    pub value: Decimal,
    /// Objective evaluated at `value`.
    pub achieved: Decimal,
    pub iterations: u32,
    /// The relative-error exit fired or the bracket shrank below tolerance.
    pub converged: bool,
    /// The target lies between the objective values at the two bounds.
    pub bracketed: bool,
}

impl SolverQuery {
    pub fn new(target: Decimal, lower_bound: Decimal, upper_bound: Decimal) -> Self {
        SolverQuery {
            target,
            lower_bound,
            upper_bound,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn with_tolerance(mut self, tolerance: Decimal) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Run the bisection. Errors come only from the objective itself.
    pub fn run<F>(&self, mut objective: F) -> WelmoraResult<Solution>
    where
        F: FnMut(Decimal) -> WelmoraResult<Decimal>,
    {
        let target = self.target;
        let mut low = self.lower_bound;
        let mut high = self.upper_bound;

        let y_low = objective(low)?;
        let y_high = objective(high)?;
        let increasing = y_high > y_low;
        let bracketed = (y_low <= target && target <= y_high) || (y_high <= target && target <= y_low);
        if !bracketed {
            warn!(
                %target,
                lower = %low,
                upper = %high,
                f_lower = %y_low,
                f_upper = %y_high,
                "solver bracket does not contain the target"
            );
        }

        let mut iterations = 0;
        while span(low, high) > self.tolerance && iterations < MAX_ITERATIONS {
            let mid = midpoint(low, high);
            let y_mid = objective(mid)?;
            iterations += 1;
            trace!(iteration = iterations, %low, %high, %mid, %y_mid, "bisection step");

            if relative_error(y_mid, target).is_some_and(|e| e < RELATIVE_ERROR_THRESHOLD) {
                debug!(iterations, value = %mid, "solver met target");
                return Ok(Solution {
                    value: mid,
                    achieved: y_mid,
                    iterations,
                    converged: true,
                    bracketed,
                });
            }

            if (y_mid < target) == increasing {
                low = mid;
            } else {
                high = mid;
            }
        }

        let value = midpoint(low, high);
        let achieved = objective(value)?;
        let converged = span(low, high) <= self.tolerance;
        debug!(iterations, converged, value = %value, "solver finished");

        Ok(Solution {
            value,
            achieved,
            iterations,
            converged,
            bracketed,
        })
    }
}

/// Find the input in `[lower_bound, upper_bound]` that makes `objective`
/// produce `target`.
///
/// The caller must supply a bracket on which the objective is monotonic and
/// which contains the target. When it does not, the midpoint of the final
/// bracket is still returned, and it may be far from satisfying the target.
pub fn solve<F>(
    target: Decimal,
    objective: F,
    lower_bound: Decimal,
    upper_bound: Decimal,
    tolerance: Decimal,
) -> WelmoraResult<Decimal>
where
    F: FnMut(Decimal) -> WelmoraResult<Decimal>,
{
    SolverQuery::new(target, lower_bound, upper_bound)
        .with_tolerance(tolerance)
        .run(objective)
        .map(|s| s.value)
}

/// Like [`solve`], but a bracket that misses the target, or a search that
/// runs out of iterations, is reported as `ConvergenceFailure`.
pub fn solve_strict<F>(
    target: Decimal,
    objective: F,
    lower_bound: Decimal,
    upper_bound: Decimal,
    tolerance: Decimal,
) -> WelmoraResult<Solution>
where
    F: FnMut(Decimal) -> WelmoraResult<Decimal>,
{
    if lower_bound > upper_bound {
        return Err(WelmoraError::invalid(
            "lower_bound",
            "Lower bound must not exceed upper bound",
        ));
    }

    let solution = SolverQuery::new(target, lower_bound, upper_bound)
        .with_tolerance(tolerance)
        .run(objective)?;

    if !solution.bracketed || !solution.converged {
        return Err(WelmoraError::ConvergenceFailure {
            function: "bisection".into(),
            iterations: solution.iterations,
            last_delta: solution
                .achieved
                .checked_sub(target)
                .map(|d| d.abs())
                .unwrap_or(Decimal::MAX),
        });
    }

    Ok(solution)
}

/// Map an overflowing objective evaluation to `Decimal::MAX`.
///
/// Growth objectives overflow only above every realistic target, so treating
/// the overflow as "larger than anything" keeps the search moving toward the
/// lower half instead of aborting it.
pub fn saturate_overflow(result: WelmoraResult<Decimal>) -> WelmoraResult<Decimal> {
    match result {
        Err(WelmoraError::ArithmeticOverflow { .. }) => Ok(Decimal::MAX),
        other => other,
    }
}

/// Attach a planner warning when a solve missed its target.
pub(crate) fn note_miss(warnings: &mut Vec<String>, variable: &str, solution: &Solution, target: Decimal) {
    if !solution.bracketed {
        warnings.push(format!(
            "Target {target} is outside what any {variable} in the search range can reach; \
             showing the nearest bound"
        ));
    } else if !solution.converged {
        warnings.push(format!(
            "Solver for {variable} stopped after {} iterations without converging",
            solution.iterations
        ));
    }
}

/// Bracket width; a width beyond `Decimal` counts as `Decimal::MAX`.
fn span(low: Decimal, high: Decimal) -> Decimal {
    high.checked_sub(low).unwrap_or(Decimal::MAX)
}

/// Halve each end first so `[Decimal::MIN, Decimal::MAX]` cannot overflow.
fn midpoint(low: Decimal, high: Decimal) -> Decimal {
    low / dec!(2) + high / dec!(2)
}

fn relative_error(value: Decimal, target: Decimal) -> Option<Decimal> {
    let scale = target.max(Decimal::ONE);
    value
        .checked_sub(target)
        .and_then(|d| d.abs().checked_div(scale))
}
