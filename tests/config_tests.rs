mod support;

use rikiddo::config::{Config, ModelConfig};
use rikiddo::domain::{LiquiditySplit, Market, ModelSpec};
use rikiddo::error::{ConfigError, Error};
use support::config::{write_temp_file, BINARY_CONFIG};

fn expect_invalid(toml: &str, expected: &str) {
    match Config::parse_toml(toml) {
        Err(Error::Config(ConfigError::InvalidValue { field, .. })) if field == expected => {}
        Err(err) => panic!("Expected invalid {expected}, got {err}"),
        Ok(_) => panic!("Expected {expected} to be rejected"),
    }
}

#[test]
fn loads_a_config_file() {
    let file = write_temp_file(BINARY_CONFIG);
    let config = Config::load(file.path()).expect("load config");

    assert_eq!(config.market.id, "rain-tomorrow");
    assert_eq!(config.logging.level, "error");
    match &config.market.model {
        ModelConfig::ScoringRule(rule) => {
            assert_eq!(rule.fee_curve, vec![0.01, 6.0, 2.0]);
            assert_eq!(rule.warmup, 1);
        }
        other => panic!("Expected scoring rule, got {other:?}"),
    }

    let market = Market::create(config.market_spec().expect("spec")).expect("create market");
    assert_eq!(market.id().as_str(), "rain-tomorrow");
    assert_eq!(market.probabilities(), &[0.5, 0.5]);
}

#[test]
fn empty_file_uses_defaults() {
    let config = Config::parse_toml("").expect("defaults");
    let spec = config.market_spec().expect("spec");

    assert_eq!(spec.outcomes.len(), 2);
    assert_eq!(spec.initial_liquidity, 1.0);
    assert_eq!(spec.split, LiquiditySplit::Balance);
    assert!(matches!(spec.model, ModelSpec::ScoringRule { .. }));
    assert_eq!(spec.solver.max_iterations, 200);
}

#[test]
fn constant_product_and_price_split() {
    let config = Config::parse_toml(
        r#"
[market]
outcomes = ["Home", "Draw", "Away"]
liquidity_split = "price"

[market.model]
type = "constant_product"
swap_fee = 0.03
"#,
    )
    .expect("parse");
    let spec = config.market_spec().expect("spec");

    assert_eq!(spec.split, LiquiditySplit::Price);
    assert_eq!(spec.model, ModelSpec::ConstantProduct { swap_fee: 0.03 });
}

#[test]
fn combinatorial_outcomes_are_expanded() {
    let config = Config::parse_toml(
        r#"
[market]
outcomes = ["A", "B", "C", "D"]
combinatorial = true
"#,
    )
    .expect("parse");
    // 4 + 12 + 24 + 24 ordered selections
    assert_eq!(config.market_spec().expect("spec").outcomes.len(), 64);
}

#[test]
fn rejects_out_of_range_parameters() {
    expect_invalid("[market]\noutcomes = [\"Only\"]\n", "outcomes");
    expect_invalid("[market]\ninitial_liquidity = 0.0\n", "initial_liquidity");
    expect_invalid("[market.model]\ntype = \"scoring_rule\"\nvig = 1.5\n", "vig");
    expect_invalid(
        "[market.model]\ntype = \"scoring_rule\"\nfee_curve = [0.01, 6.0]\n",
        "fee_curve",
    );
    expect_invalid(
        "[market.model]\ntype = \"scoring_rule\"\nmin_revenue = 0.0\n",
        "min_revenue",
    );
    expect_invalid(
        "[market.model]\ntype = \"constant_product\"\nswap_fee = 1.0\n",
        "swap_fee",
    );
    expect_invalid("[solver]\nmax_iterations = 0\n", "max_iterations");
    expect_invalid("[logging]\nformat = \"xml\"\n", "format");
}

#[test]
fn rejects_blank_identifiers() {
    match Config::parse_toml("[market]\nid = \"  \"\n") {
        Err(Error::Config(ConfigError::MissingField { field: "id" })) => {}
        other => panic!("Expected missing id, got {other:?}"),
    }
}

#[test]
fn reports_parse_and_read_failures() {
    assert!(matches!(
        Config::parse_toml("[market\nid = 1"),
        Err(Error::Config(ConfigError::Parse(_)))
    ));
    assert!(matches!(
        Config::load("/nonexistent/rikiddo.toml"),
        Err(Error::Config(ConfigError::ReadFile(_)))
    ));
}
