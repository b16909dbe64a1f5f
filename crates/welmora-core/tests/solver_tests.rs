use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use welmora_core::accumulation::sip::simulate_accumulation;
use welmora_core::amortization::emi::calculate_installment;
use welmora_core::depletion::swp::simulate_depletion;
use welmora_core::solver::{solve, solve_strict, SolverQuery, DEFAULT_TOLERANCE, MAX_ITERATIONS};
use welmora_core::WelmoraError;

// ===========================================================================
// Engine inversions
// ===========================================================================

#[test]
fn test_solve_loan_rate_for_installment() {
    let rate = solve(
        dec!(43391),
        |r| calculate_installment(dec!(5_000_000), r, dec!(20)),
        dec!(0.1),
        dec!(50),
        DEFAULT_TOLERANCE,
    )
    .unwrap();
    assert!((rate - dec!(8.5)).abs() < dec!(0.01), "got {rate}");
}

#[test]
fn test_solve_sip_contribution_for_target() {
    let target = dec!(10_000_000);
    let sip = solve(
        target,
        |c| simulate_accumulation(c, Decimal::ZERO, dec!(12), dec!(15), None).map(|s| s.final_value),
        Decimal::ZERO,
        target,
        DEFAULT_TOLERANCE,
    )
    .unwrap();
    let reached = simulate_accumulation(sip, Decimal::ZERO, dec!(12), dec!(15), None)
        .unwrap()
        .final_value;
    assert!((reached - target).abs() / target < dec!(0.0001), "got {reached}");
}

#[test]
fn test_solve_swp_years_lasted() {
    // Decreasing objective: more years, lower final balance.
    let years = solve(
        Decimal::ZERO,
        |t| simulate_depletion(dec!(600_000), dec!(10_000), Decimal::ZERO, t, None).map(|s| s.final_value),
        Decimal::ZERO,
        dec!(100),
        DEFAULT_TOLERANCE,
    )
    .unwrap();
    assert!((years - dec!(5)).abs() < dec!(0.1), "got {years}");
}

// ===========================================================================
// Contract edge cases
// ===========================================================================

#[test]
fn test_solver_report_for_rootless_bracket() {
    let solution = SolverQuery::new(dec!(-5), dec!(0), dec!(10))
        .run(|x| Ok(x * x))
        .unwrap();
    assert!(!solution.bracketed);
    assert!(solution.value < dec!(0.01));
    assert!(solution.iterations <= MAX_ITERATIONS);
}

#[test]
fn test_solve_strict_accepts_good_bracket() {
    let solution = solve_strict(dec!(25), |x| Ok(x * x), dec!(0), dec!(10), DEFAULT_TOLERANCE).unwrap();
    assert!(solution.converged);
    assert!((solution.value - dec!(5)).abs() < dec!(0.01));
}

#[test]
fn test_solve_strict_rejects_inverted_bounds() {
    let err = solve_strict(dec!(1), |x| Ok(x), dec!(10), dec!(0), DEFAULT_TOLERANCE).unwrap_err();
    assert!(matches!(err, WelmoraError::InvalidInput { .. }));
}

#[test]
fn test_flat_objective_returns_without_panic() {
    let x = solve(dec!(3), |_| Ok(dec!(7)), dec!(0), dec!(1), DEFAULT_TOLERANCE).unwrap();
    assert!(x >= dec!(0) && x <= dec!(1));
}

#[test]
fn test_solve_over_entire_decimal_range() {
    let x = solve(dec!(1), |x| Ok(x), Decimal::MIN, Decimal::MAX, DEFAULT_TOLERANCE).unwrap();
    assert!((x - dec!(1)).abs() < dec!(1), "got {x}");
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(32))]

    #[test]
    fn prop_installment_increases_with_rate(
        principal in 10_000u32..50_000_000,
        rate_bp in 0u32..4_900,
        bump_bp in 1u32..100,
        years in 1u32..40
    ) {
        let p = Decimal::from(principal);
        let t = Decimal::from(years);
        let low = calculate_installment(p, Decimal::new(rate_bp as i64, 2), t).unwrap();
        let high = calculate_installment(p, Decimal::new((rate_bp + bump_bp) as i64, 2), t).unwrap();
        prop_assert!(high > low, "{} !> {}", high, low);
    }

    #[test]
    fn prop_rate_round_trip_through_installment(
        principal in 100_000u32..20_000_000,
        rate_bp in 10u32..5_000,
        years in 1u32..30
    ) {
        let p = Decimal::from(principal);
        let t = Decimal::from(years);
        let target = calculate_installment(p, Decimal::new(rate_bp as i64, 2), t).unwrap();
        let rate = solve(target, |r| calculate_installment(p, r, t), dec!(0.1), dec!(50), DEFAULT_TOLERANCE).unwrap();
        let achieved = calculate_installment(p, rate, t).unwrap();
        prop_assert!((achieved - target).abs() / target < dec!(0.002));
    }

    #[test]
    fn prop_contribution_round_trip_through_sip(
        contribution in 100u32..100_000,
        rate_bp in 0u32..3_000,
        years in 1u32..30
    ) {
        let rate = Decimal::new(rate_bp as i64, 2);
        let t = Decimal::from(years);
        let target = simulate_accumulation(Decimal::from(contribution), Decimal::ZERO, rate, t, None)
            .unwrap()
            .final_value;
        let solved = solve(
            target,
            |c| simulate_accumulation(c, Decimal::ZERO, rate, t, None).map(|s| s.final_value),
            Decimal::ZERO,
            target,
            DEFAULT_TOLERANCE,
        )
        .unwrap();
        let expected = Decimal::from(contribution);
        prop_assert!((solved - expected).abs() / expected < dec!(0.0002), "solved {}", solved);
    }

    #[test]
    fn prop_corpus_round_trip_through_swp(
        withdrawal in 1_000u32..200_000,
        rate_bp in 0u32..1_500,
        years in 1u32..30
    ) {
        let w = Decimal::from(withdrawal);
        let rate = Decimal::new(rate_bp as i64, 2);
        let t = Decimal::from(years);
        let upper = w * dec!(12) * t * dec!(2);
        let corpus = solve(
            Decimal::ZERO,
            |c| simulate_depletion(c, w, rate, t, None).map(|s| s.final_value),
            Decimal::ZERO,
            upper,
            DEFAULT_TOLERANCE,
        )
        .unwrap();
        let left = simulate_depletion(corpus, w, rate, t, None).unwrap().final_value;
        prop_assert!(left.abs() < dec!(1), "left {}", left);
    }
}
