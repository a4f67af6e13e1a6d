//! Share solver budget.

use serde::Deserialize;

use crate::domain::SolverConfig as SolverBudget;

/// Iteration and tolerance limits for the trade solver.
#[derive(Debug, Clone, Deserialize)]
pub struct SolverConfig {
    /// Maximum solver iterations per trade.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Relative residual accepted as converged.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_max_iterations() -> usize {
    SolverBudget::default().max_iterations
}

fn default_tolerance() -> f64 {
    SolverBudget::default().tolerance
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
        }
    }
}

impl From<&SolverConfig> for SolverBudget {
    fn from(config: &SolverConfig) -> Self {
        Self {
            max_iterations: config.max_iterations,
            tolerance: config.tolerance,
        }
    }
}
