//! Configuration loading and validation.
//!
//! Provides the main [`Config`] struct. Every section is optional; missing
//! sections and fields fall back to the defaults of a two-outcome scoring-rule
//! market.
//!
//! # Example
//!
//! ```no_run
//! use rikiddo::config::Config;
//! use rikiddo::domain::Market;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("rikiddo.toml")?;
//!     config.init_logging();
//!     let market = Market::create(config.market_spec()?)?;
//!     println!("{:?}", market.probabilities());
//!     Ok(())
//! }
//! ```

use serde::Deserialize;
use std::path::Path;

use super::logging::LoggingConfig;
use super::model::ModelConfig;
use super::solver::SolverConfig;
use crate::domain::{
    ActorId, LiquiditySplit, MarketId, MarketSpec, OutcomeId, OutcomeSet, DEFAULT_CREATOR,
};
use crate::error::{ConfigError, Result};

/// Market definition.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    /// Market identifier.
    #[serde(default = "default_market_id")]
    pub id: String,
    /// Outcome names, at least two.
    #[serde(default = "default_outcomes")]
    pub outcomes: Vec<String>,
    /// Subsidy split evenly across outcomes at creation.
    #[serde(default = "default_initial_liquidity")]
    pub initial_liquidity: f64,
    /// Actor credited with the subsidy.
    #[serde(default = "default_creator")]
    pub creator: String,
    /// Expand the outcomes into every ordered selection.
    #[serde(default)]
    pub combinatorial: bool,
    /// How liquidity is spread across outcomes.
    #[serde(default)]
    pub liquidity_split: LiquiditySplit,
    /// Pricing model.
    #[serde(default)]
    pub model: ModelConfig,
}

fn default_market_id() -> String {
    "market".to_string()
}

fn default_outcomes() -> Vec<String> {
    vec!["Yes".to_string(), "No".to_string()]
}

const fn default_initial_liquidity() -> f64 {
    1.0
}

fn default_creator() -> String {
    DEFAULT_CREATOR.to_string()
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            id: default_market_id(),
            outcomes: default_outcomes(),
            initial_liquidity: default_initial_liquidity(),
            creator: default_creator(),
            combinatorial: false,
            liquidity_split: LiquiditySplit::default(),
            model: ModelConfig::default(),
        }
    }
}

/// Main configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// The market to open.
    #[serde(default)]
    pub market: MarketConfig,

    /// Share solver limits.
    #[serde(default)]
    pub solver: SolverConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// malformed, or validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Initialize the tracing subscriber from the logging section.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Build the market spec described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` for an empty id or outcome list and
    /// `ConfigError::InvalidValue` for parameters the market rejects.
    pub fn market_spec(&self) -> Result<MarketSpec> {
        let market = &self.market;
        if market.id.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "id" }.into());
        }
        if market.outcomes.is_empty() {
            return Err(ConfigError::MissingField { field: "outcomes" }.into());
        }
        if market.creator.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "creator" }.into());
        }

        let names: Vec<OutcomeId> = market
            .outcomes
            .iter()
            .map(|name| OutcomeId::from(name.as_str()))
            .collect();
        let outcomes = if market.combinatorial {
            OutcomeSet::combinatorial(names)
        } else {
            OutcomeSet::try_new(names)
        }
        .map_err(ConfigError::from)?;

        Ok(MarketSpec::new(outcomes)
            .with_id(MarketId::from(market.id.as_str()))
            .with_model(market.model.to_spec()?)
            .with_initial_liquidity(market.initial_liquidity)
            .with_creator(ActorId::from(market.creator.as_str()))
            .with_split(market.liquidity_split)
            .with_solver((&self.solver).into()))
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        let spec = self.market_spec()?;

        if !(spec.initial_liquidity.is_finite() && spec.initial_liquidity > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "initial_liquidity",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        spec.solver.validate().map_err(ConfigError::from)?;
        spec.model
            .build(spec.outcomes.len())
            .map_err(ConfigError::from)?;

        match self.logging.format.as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(ConfigError::InvalidValue {
                field: "format",
                reason: format!("expected \"pretty\" or \"json\", got \"{other}\""),
            }
            .into()),
        }
    }
}
