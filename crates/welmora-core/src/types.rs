use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Annual rates expressed as percentages (12 = 12% p.a.). Never as fractions.
pub type Rate = Decimal;

/// Tenure in years; may be fractional (0.5 = six months).
pub type Years = Decimal;

/// One annual sample of a monthly simulation.
///
/// `primary_value` is always the balance at the end of `year` (outstanding
/// loan, portfolio value or remaining corpus). `secondary_value` carries the
/// engine's running total: cumulative interest for a loan, total invested for
/// a SIP. SWP points have no secondary value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationPoint {
    pub year: u32,
    pub primary_value: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_value: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark_value: Option<Money>,
}

impl SimulationPoint {
    pub fn new(year: u32, primary_value: Money) -> Self {
        SimulationPoint {
            year,
            primary_value,
            secondary_value: None,
            benchmark_value: None,
        }
    }

    pub fn with_secondary(mut self, value: Money) -> Self {
        self.secondary_value = Some(value);
        self
    }

    pub fn with_benchmark(mut self, value: Money) -> Self {
        self.benchmark_value = Some(value);
        self
    }
}

/// Outcome of an accumulation (SIP) or depletion (SWP) run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Balance after the last simulated month. Signed for SWP.
    pub final_value: Money,
    /// Total invested (SIP) or total withdrawn (SWP).
    pub aggregate_flow: Money,
    /// Final balance of the fixed-rate reference track, when one was run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark_final_value: Option<Money>,
    pub history: Vec<SimulationPoint>,
}

impl SimulationResult {
    /// The result reported when a run is refused by a guard.
    pub fn zeroed() -> Self {
        SimulationResult {
            final_value: Decimal::ZERO,
            aggregate_flow: Decimal::ZERO,
            benchmark_final_value: None,
            history: Vec::new(),
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
