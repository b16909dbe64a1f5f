//! Depletion engine: systematic withdrawal plans (SWP).
pub mod planner;
pub mod swp;
