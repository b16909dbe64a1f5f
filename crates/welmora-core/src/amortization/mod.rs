//! Amortization engine: fixed-installment loans (EMI).
pub mod emi;
pub mod planner;
