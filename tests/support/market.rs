use rikiddo::domain::{
    ActorId, FeeParameters, IndicatorConfig, Market, MarketSpec, ModelSpec, OutcomeId, OutcomeSet,
};

pub fn outcome_set(names: &[&str]) -> OutcomeSet {
    OutcomeSet::try_new(names.iter().map(|n| OutcomeId::from(*n)).collect())
        .expect("valid outcomes")
}

pub fn named_outcomes(n: usize) -> OutcomeSet {
    let names: Vec<String> = (0..n).map(|i| format!("o{i}")).collect();
    OutcomeSet::try_new(names.iter().map(|n| OutcomeId::from(n.as_str())).collect())
        .expect("valid outcomes")
}

pub fn scoring_rule(fee: FeeParameters) -> ModelSpec {
    ModelSpec::ScoringRule {
        fee,
        indicator: IndicatorConfig::default(),
    }
}

/// Two outcomes, init 1.0, vig 0.1, warm-up 1.
pub fn make_binary_market() -> Market {
    Market::create(MarketSpec::new(outcome_set(&["Yes", "No"]))).expect("create market")
}

/// Scoring-rule market whose fee coefficient never leaves the base fee.
pub fn make_flat_fee_market(n: usize, init: f64) -> Market {
    let fee = FeeParameters {
        warmup: usize::MAX,
        ..FeeParameters::default()
    };
    let spec = MarketSpec::new(named_outcomes(n))
        .with_model(scoring_rule(fee))
        .with_initial_liquidity(init);
    Market::create(spec).expect("create market")
}

pub fn actor(name: &str) -> ActorId {
    ActorId::from(name)
}
