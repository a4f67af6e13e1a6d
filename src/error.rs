use thiserror::Error;

use crate::domain::MarketError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

impl From<MarketError> for ConfigError {
    fn from(err: MarketError) -> Self {
        match err {
            MarketError::Configuration { field, reason } => Self::InvalidValue { field, reason },
            other => Self::InvalidValue {
                field: "market",
                reason: other.to_string(),
            },
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Market(#[from] MarketError),

    #[error("failed to parse script: {0}")]
    Script(#[source] toml::de::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_configuration_maps_to_invalid_value() {
        let err: ConfigError = MarketError::Configuration {
            field: "vig",
            reason: "must be in (0, 1)".into(),
        }
        .into();
        assert!(matches!(err, ConfigError::InvalidValue { field: "vig", .. }));
    }

    #[test]
    fn market_errors_pass_through() {
        let err: Error = MarketError::DegenerateState { reason: "empty" }.into();
        assert_eq!(err.to_string(), "degenerate market state: empty");
    }
}
