use std::path::Path;

use crate::cli::output;
use crate::config::Config;
use crate::domain::Market;
use crate::error::Result;

/// Validate a configuration file and open the market it describes.
pub fn execute<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    println!("Checking configuration: {}", path.display());

    let config = Config::load(path)?;
    config.init_logging();
    let market = Market::create(config.market_spec()?)?;

    output::ok("Configuration file is valid");
    output::section("Market");
    output::summary(&market);
    key_values(&config);
    output::section("Opening state");
    output::outcomes(&market);
    println!();

    Ok(())
}

fn key_values(config: &Config) {
    let market = &config.market;
    output::key_value("Creator", &market.creator);
    output::key_value("Subsidy", market.initial_liquidity);
    output::key_value("Split", format!("{:?}", market.liquidity_split).to_lowercase());
    if market.combinatorial {
        output::key_value("Base outcomes", market.outcomes.join(", "));
    }
    output::key_value(
        "Solver",
        format!(
            "{} iterations, tolerance {:e}",
            config.solver.max_iterations, config.solver.tolerance
        ),
    );
}
