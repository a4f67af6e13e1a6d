//! TOML configuration.

pub mod logging;
pub mod model;
pub mod settings;
pub mod solver;

pub use logging::LoggingConfig;
pub use model::{ConstantProductConfig, IndicatorSettings, ModelConfig, ScoringRuleConfig};
pub use settings::{Config, MarketConfig};
pub use solver::SolverConfig;
