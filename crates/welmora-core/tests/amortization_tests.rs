use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use welmora_core::amortization::emi::{calculate_installment, calculate_schedule};
use welmora_core::amortization::planner::{plan_loan, LoanGoal, LoanPlanInput};
use welmora_core::WelmoraError;

// ===========================================================================
// Installment (EMI) tests
// ===========================================================================

fn assert_emi(principal: Decimal, rate: Decimal, years: Decimal, expected: Decimal) {
    let emi = calculate_installment(principal, rate, years).unwrap();
    assert!(
        (emi - expected).abs() < dec!(1),
        "EMI for {principal} @ {rate}% over {years}y: expected ~{expected}, got {emi}"
    );
}

#[test]
fn test_emi_reference_loans() {
    assert_emi(dec!(5_000_000), dec!(8.5), dec!(20), dec!(43391));
    assert_emi(dec!(1_000_000), dec!(9), dec!(5), dec!(20758));
    assert_emi(dec!(200_000), dec!(14), dec!(3), dec!(6836));
    assert_emi(dec!(50_000), dec!(12), dec!(2), dec!(2354));
    assert_emi(dec!(10_000_000), dec!(8), dec!(30), dec!(73376));
    assert_emi(dec!(100_000), dec!(10), dec!(5), dec!(2125));
    assert_emi(dec!(10_000_000), dec!(9), dec!(20), dec!(89973));
}

#[test]
fn test_emi_extreme_rates() {
    // 0.1% p.a. barely adds to the straight-line 8333.
    assert_emi(dec!(1_000_000), dec!(0.1), dec!(10), dec!(8376));
    assert_emi(dec!(500_000), dec!(30), dec!(5), dec!(16176));
}

#[test]
fn test_emi_zero_rate_closed_form() {
    for (principal, years) in [(dec!(120_000), dec!(1)), (dec!(999_999), dec!(7)), (dec!(5), dec!(0.5))] {
        let emi = calculate_installment(principal, Decimal::ZERO, years).unwrap();
        assert_eq!(emi, principal / (years * dec!(12)));
    }
}

#[test]
fn test_emi_half_year_tenure() {
    // Six payments at 1% a month.
    assert_emi(dec!(100_000), dec!(12), dec!(0.5), dec!(17254.84));
}

#[test]
fn test_emi_invalid_inputs() {
    let err = calculate_installment(dec!(-1), dec!(10), dec!(5)).unwrap_err();
    match err {
        WelmoraError::InvalidInput { field, .. } => assert_eq!(field, "principal"),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(calculate_installment(dec!(1000), dec!(10), dec!(-2)).is_err());
}

// ===========================================================================
// Schedule tests
// ===========================================================================

#[test]
fn test_schedule_interest_matches_total_paid() {
    let principal = dec!(2_000_000);
    let emi = calculate_installment(principal, dec!(10), dec!(10)).unwrap();
    let schedule = calculate_schedule(principal, dec!(10), dec!(10), emi).unwrap();

    assert_eq!(schedule.history.len(), 11);
    assert_eq!(schedule.history.first().map(|p| p.year), Some(0));
    assert_eq!(schedule.history.last().map(|p| p.year), Some(10));
    assert_eq!(schedule.history[10].primary_value, Decimal::ZERO);

    let paid = emi * dec!(120);
    assert!((schedule.total_interest - (paid - principal)).abs() < dec!(1));
}

#[test]
fn test_schedule_interest_is_cumulative() {
    let emi = calculate_installment(dec!(800_000), dec!(9), dec!(8)).unwrap();
    let schedule = calculate_schedule(dec!(800_000), dec!(9), dec!(8), emi).unwrap();
    for pair in schedule.history.windows(2) {
        assert!(pair[1].secondary_value >= pair[0].secondary_value);
    }
}

#[test]
fn test_schedule_overpayment_stops_at_zero() {
    // Paying double the EMI clears the loan early; later years stay at zero.
    let emi = calculate_installment(dec!(500_000), dec!(10), dec!(10)).unwrap();
    let schedule = calculate_schedule(dec!(500_000), dec!(10), dec!(10), emi * dec!(2)).unwrap();
    assert_eq!(schedule.history.len(), 11);
    assert!(schedule.history[6..]
        .iter()
        .all(|p| p.primary_value == Decimal::ZERO));
}

#[test]
fn test_schedule_with_caller_installment_never_panics() {
    let zero = calculate_schedule(dec!(1_000_000_000), dec!(50), dec!(100), Decimal::ZERO);
    assert!(matches!(zero, Err(WelmoraError::InvalidInput { .. })));

    // Installment below the monthly interest: the balance grows until it overflows.
    let underpaid = calculate_schedule(dec!(1_000_000_000), dec!(50), dec!(100), dec!(1000));
    assert!(matches!(underpaid, Err(WelmoraError::ArithmeticOverflow { .. })));
}

// ===========================================================================
// Loan planner tests
// ===========================================================================

#[test]
fn test_plan_loan_from_json() {
    let json = r#"{"goal": "emi", "principal": 1000000, "annual_rate_pct": "9", "tenure_years": 5}"#;
    let input: LoanPlanInput = serde_json::from_str(json).unwrap();
    assert_eq!(input.goal, LoanGoal::Installment);

    let out = plan_loan(&input).unwrap();
    assert!((out.result.installment - dec!(20758)).abs() < dec!(1));
    assert_eq!(out.result.solved_value, out.result.installment);
    assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    assert_eq!(out.assumptions["tenure_years"], serde_json::json!("5"));
}

#[test]
fn test_plan_loan_principal_round_trip() {
    let installment = calculate_installment(dec!(3_000_000), dec!(7.5), dec!(15)).unwrap();
    let input = LoanPlanInput {
        goal: LoanGoal::Principal,
        principal: Decimal::ZERO,
        annual_rate_pct: dec!(7.5),
        tenure_years: dec!(15),
        installment,
    };
    let out = plan_loan(&input).unwrap().result;
    assert!((out.principal - dec!(3_000_000)).abs() < dec!(0.01), "got {}", out.principal);
}

#[test]
fn test_plan_loan_total_payment() {
    let input = LoanPlanInput {
        goal: LoanGoal::Installment,
        principal: dec!(100_000),
        annual_rate_pct: Decimal::ZERO,
        tenure_years: dec!(2),
        installment: Decimal::ZERO,
    };
    let out = plan_loan(&input).unwrap().result;
    assert_eq!(out.total_payment, dec!(100_000));
    assert_eq!(out.total_interest, Decimal::ZERO);
}
