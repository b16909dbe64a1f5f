use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WelmoraError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Arithmetic overflow in {context}")]
    ArithmeticOverflow { context: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Convergence failure: {function} did not converge after {iterations} iterations (delta: {last_delta})")]
    ConvergenceFailure {
        function: String,
        iterations: u32,
        last_delta: Decimal,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl WelmoraError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        WelmoraError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn overflow(context: &str) -> Self {
        WelmoraError::ArithmeticOverflow {
            context: context.into(),
        }
    }
}

impl From<serde_json::Error> for WelmoraError {
    fn from(e: serde_json::Error) -> Self {
        WelmoraError::SerializationError(e.to_string())
    }
}
