//! Configuration for the layout solver

use serde::Deserialize;

/// Largest geometric error a condition accepts unless told otherwise
pub const DEFAULT_TOLERANCE: f64 = 1.0;

/// Score a condition adds when it holds
pub const DEFAULT_VALUE: f64 = 1.0;

/// Multiplier applied to the value of a failing condition
pub const DEFAULT_ERROR_FACTOR: f64 = -10.0;

/// Pass ceiling for the fixed-point loop
pub const DEFAULT_MAX_PASSES: usize = 24;

/// Configuration options for solving
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// Upper bound on relaxation passes
    pub max_passes: usize,

    /// Tolerance given to conditions built from documents
    pub default_tolerance: f64,

    /// Value given to conditions built from documents
    pub default_value: f64,

    /// Error factor given to conditions built from documents
    pub default_error_factor: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_passes: DEFAULT_MAX_PASSES,
            default_tolerance: DEFAULT_TOLERANCE,
            default_value: DEFAULT_VALUE,
            default_error_factor: DEFAULT_ERROR_FACTOR,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pass ceiling (at least one pass always runs)
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes.max(1);
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.default_tolerance = tolerance;
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.default_value = value;
        self
    }

    pub fn with_error_factor(mut self, error_factor: f64) -> Self {
        self.default_error_factor = error_factor;
        self
    }
}
