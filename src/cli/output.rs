//! Shared CLI output helpers for consistent operator-facing text.

use std::fmt::Display;

use tabled::{Table, Tabled};

use crate::domain::Market;

const RULE_WIDTH: usize = 56;

/// Print a section header and separator.
pub fn section(title: &str) {
    println!();
    println!("{title}");
    println!("{}", "─".repeat(RULE_WIDTH));
}

/// Print a simple key/value line.
pub fn key_value(label: &str, value: impl Display) {
    println!("{label:<16} {value}");
}

/// Print a successful status line.
pub fn ok(message: &str) {
    println!("✓ {message}");
}

/// Print a warning status line.
pub fn warn(message: &str) {
    println!("⚠ {message}");
}

/// Print an error status line.
pub fn error(message: &str) {
    eprintln!("✗ {message}");
}

/// Print a table indented under the current section.
pub fn table<T: Tabled>(rows: impl IntoIterator<Item = T>) {
    let table = Table::new(rows).to_string();
    for line in table.lines() {
        println!("  {line}");
    }
}

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Outcome")]
    outcome: String,
    #[tabled(rename = "Shares")]
    shares: String,
    #[tabled(rename = "Probability")]
    probability: String,
}

/// Print the current share vector and probabilities.
pub fn outcomes(market: &Market) {
    let rows = market
        .outcomes()
        .iter()
        .zip(market.balances())
        .zip(market.probabilities())
        .enumerate()
        .map(|(index, ((outcome, shares), probability))| OutcomeRow {
            index,
            outcome: outcome.to_string(),
            shares: format!("{shares:.6}"),
            probability: format!("{probability:.6}"),
        });
    table(rows);
}

/// Print the market overview.
pub fn summary(market: &Market) {
    let summary = market.summary();
    key_value("Market", &summary.id);
    key_value("Model", summary.model);
    key_value("Outcomes", summary.outcomes);
    key_value("Market value", format!("{:.6}", summary.market_value));
    if let Some(b) = summary.liquidity {
        key_value("Liquidity (b)", format!("{b:.6}"));
    }
    if let Some(ratio) = summary.ratio {
        key_value("Volume ratio", format!("{ratio:.6}"));
    }
    key_value("Book entries", summary.book_entries);
}
