//! Accumulation engine: systematic investment plans (SIP).
pub mod planner;
pub mod sip;
