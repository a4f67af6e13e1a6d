//! Replay a script of market operations.
//!
//! Scripts are TOML files with one `[[op]]` table per operation:
//!
//! ```toml
//! [[op]]
//! kind = "buy"
//! actor = "alice"
//! amount = 0.1
//! outcome = 0
//! ```
//!
//! `buy` and `sell` need an `outcome`; `provide` and `remove` ignore it.
//! Rejected operations are reported and skipped.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tabled::Tabled;

use crate::cli::command::ReplayArgs;
use crate::cli::output;
use crate::config::Config;
use crate::domain::{ActorId, BookEntry, Market, MarketError, MarketSummary};
use crate::error::{Error, Result};

/// Operation kinds a script may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    Buy,
    Sell,
    Provide,
    Remove,
}

/// One scripted operation.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptOp {
    pub kind: OpKind,
    pub actor: String,
    pub amount: f64,
    #[serde(default)]
    pub outcome: Option<usize>,
}

/// A parsed script.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    #[serde(default, rename = "op")]
    pub ops: Vec<ScriptOp>,
}

impl Script {
    /// Parse a script from TOML content.
    ///
    /// # Errors
    ///
    /// Returns `Error::Script` for malformed content.
    pub fn parse_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(Error::Script)
    }

    /// Load a script file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and `Error::Script` if
    /// it cannot be parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }
}

/// An operation the market refused.
#[derive(Debug, Clone, Serialize)]
pub struct Rejection {
    /// Position in the script, starting at zero.
    pub index: usize,
    pub kind: OpKind,
    pub actor: String,
    pub error: String,
}

/// Everything a replay produced.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub summary: MarketSummary,
    pub book: Vec<BookEntry>,
    pub rejected: Vec<Rejection>,
}

/// Apply every operation in order. Failures are collected, not fatal.
pub fn apply(market: &mut Market, script: &Script) -> Vec<Rejection> {
    script
        .ops
        .iter()
        .enumerate()
        .filter_map(|(index, op)| {
            apply_one(market, op).err().map(|error| Rejection {
                index,
                kind: op.kind,
                actor: op.actor.clone(),
                error,
            })
        })
        .collect()
}

fn apply_one(market: &mut Market, op: &ScriptOp) -> std::result::Result<(), String> {
    let actor = ActorId::from(op.actor.as_str());
    let outcome = || op.outcome.ok_or_else(|| format!("{:?} requires an outcome", op.kind));
    let result = match op.kind {
        OpKind::Buy => market.buy(&actor, op.amount, outcome()?).map(drop),
        OpKind::Sell => market.sell(&actor, op.amount, outcome()?).map(drop),
        OpKind::Provide => market.provide_liquidity(&actor, op.amount).map(drop),
        OpKind::Remove => market.remove_liquidity(&actor, op.amount).map(drop),
    };
    result.map_err(|err: MarketError| err.to_string())
}

#[derive(Tabled)]
struct BookRow {
    #[tabled(rename = "Seq")]
    seq: usize,
    #[tabled(rename = "Actor")]
    actor: String,
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Outcome")]
    outcome: String,
    #[tabled(rename = "Shares")]
    shares: String,
    #[tabled(rename = "Paid")]
    paid: String,
    #[tabled(rename = "Fee")]
    fee: String,
    #[tabled(rename = "Unit")]
    unit: String,
}

/// Run `rikiddo replay`.
pub fn execute(args: &ReplayArgs) -> Result<()> {
    let config = Config::load(&args.config)?;
    config.init_logging();
    let script = Script::load(&args.script)?;
    let mut market = Market::create(config.market_spec()?)?;

    let rejected = apply(&mut market, &script);

    if args.json {
        let report = ReplayReport {
            summary: market.summary(),
            book: market.book().entries().to_vec(),
            rejected,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    output::section("Book");
    let rows = market.book().entries().iter().map(|entry| BookRow {
        seq: entry.seq,
        actor: entry.actor.to_string(),
        kind: entry.kind.as_str(),
        outcome: market
            .outcomes()
            .get(entry.outcome)
            .map(ToString::to_string)
            .unwrap_or_default(),
        shares: format!("{:.6}", entry.shares),
        paid: format!("{:.6}", entry.paid),
        fee: format!("{:.6}", entry.fee_cost),
        unit: format!("{:.6}", entry.unit_price()),
    });
    output::table(rows);

    output::section("Final state");
    output::outcomes(&market);
    println!();
    output::summary(&market);

    if !rejected.is_empty() {
        output::section("Rejected");
        for rejection in &rejected {
            output::warn(&format!(
                "op {} ({:?} by {}): {}",
                rejection.index, rejection.kind, rejection.actor, rejection.error
            ));
        }
    }
    println!();

    Ok(())
}
