use crate::cli::command::QuoteArgs;
use crate::cli::output;
use crate::config::Config;
use crate::domain::Market;
use crate::error::Result;

/// Quote a trade against a freshly opened market.
pub fn execute(args: &QuoteArgs) -> Result<()> {
    let config = Config::load(&args.config)?;
    config.init_logging();
    let market = Market::create(config.market_spec()?)?;

    let price = market.quote(args.outcome, args.delta)?;
    let label = market
        .outcomes()
        .get(args.outcome)
        .map(ToString::to_string)
        .unwrap_or_default();

    output::section("Quote");
    output::key_value("Outcome", format!("{} ({label})", args.outcome));
    output::key_value("Delta", args.delta);
    output::key_value("Price", format!("{price:.9}"));
    if args.delta != 0.0 {
        output::key_value("Per share", format!("{:.9}", (price / args.delta).abs()));
    }
    output::key_value(
        "Marginal",
        format!("{:.9}", market.probabilities()[args.outcome]),
    );
    println!();

    Ok(())
}
