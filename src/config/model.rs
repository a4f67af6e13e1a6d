//! Pricing model configuration.

use serde::Deserialize;

use crate::domain::{FeeParameters, IndicatorConfig, ModelSpec, VolumeSeries};
use crate::error::ConfigError;

/// Pricing model, selected by the `type` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelConfig {
    /// Dynamic-fee LMSR.
    ScoringRule(ScoringRuleConfig),
    /// Constant-product pool.
    ConstantProduct(ConstantProductConfig),
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::ScoringRule(ScoringRuleConfig::default())
    }
}

impl ModelConfig {
    /// Convert to the domain model spec.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for out-of-range parameters.
    pub fn to_spec(&self) -> Result<ModelSpec, ConfigError> {
        match self {
            Self::ScoringRule(config) => {
                let fee = FeeParameters::try_new(
                    config.vig,
                    &config.fee_curve,
                    config.min_revenue,
                    config.warmup,
                )?;
                Ok(ModelSpec::ScoringRule {
                    fee,
                    indicator: config.indicator.into(),
                })
            }
            Self::ConstantProduct(config) => Ok(ModelSpec::ConstantProduct {
                swap_fee: config.swap_fee,
            }),
        }
    }
}

/// Scoring-rule parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringRuleConfig {
    /// Vigorish, in `(0, 1)`.
    #[serde(default = "default_vig")]
    pub vig: f64,
    /// Fee curve `[param_1, param_2, param_3]`.
    #[serde(default = "default_fee_curve")]
    pub fee_curve: Vec<f64>,
    /// Minimum revenue coefficient, in `(0, 1]`.
    #[serde(default = "default_min_revenue")]
    pub min_revenue: f64,
    /// Trades before the dynamic fee applies.
    #[serde(default = "default_warmup")]
    pub warmup: usize,
    /// Volume indicator settings.
    #[serde(default)]
    pub indicator: IndicatorSettings,
}

fn default_vig() -> f64 {
    FeeParameters::default().vig
}

fn default_fee_curve() -> Vec<f64> {
    FeeParameters::default().curve.to_vec()
}

fn default_min_revenue() -> f64 {
    FeeParameters::default().min_revenue
}

fn default_warmup() -> usize {
    FeeParameters::default().warmup
}

impl Default for ScoringRuleConfig {
    fn default() -> Self {
        Self {
            vig: default_vig(),
            fee_curve: default_fee_curve(),
            min_revenue: default_min_revenue(),
            warmup: default_warmup(),
            indicator: IndicatorSettings::default(),
        }
    }
}

/// Ratio indicator windows.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IndicatorSettings {
    /// Records in the long window.
    #[serde(default = "default_long_window")]
    pub long_window: usize,
    /// Records in the short window.
    #[serde(default = "default_short_window")]
    pub short_window: usize,
    /// Volume series to average.
    #[serde(default)]
    pub series: VolumeSeries,
}

fn default_long_window() -> usize {
    IndicatorConfig::default().long_window
}

fn default_short_window() -> usize {
    IndicatorConfig::default().short_window
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            long_window: default_long_window(),
            short_window: default_short_window(),
            series: VolumeSeries::default(),
        }
    }
}

impl From<IndicatorSettings> for IndicatorConfig {
    fn from(settings: IndicatorSettings) -> Self {
        Self {
            long_window: settings.long_window,
            short_window: settings.short_window,
            series: settings.series,
        }
    }
}

/// Constant-product parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct ConstantProductConfig {
    /// Swap fee, in `[0, 1)`.
    #[serde(default = "default_swap_fee")]
    pub swap_fee: f64,
}

fn default_swap_fee() -> f64 {
    0.02
}
