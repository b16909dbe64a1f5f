pub mod error;
pub mod solver;
pub mod step_up;
pub mod time_value;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "accumulation")]
pub mod accumulation;

#[cfg(feature = "depletion")]
pub mod depletion;

#[cfg(feature = "comparison")]
pub mod comparison;

pub use error::WelmoraError;
pub use types::*;

/// Standard result type for all welmora operations
pub type WelmoraResult<T> = Result<T, WelmoraError>;
