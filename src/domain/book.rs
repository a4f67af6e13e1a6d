//! The market book: an append-only record of trades and liquidity events.
//!
//! The book drives the ratio indicator (trade volume) and is the export surface
//! for callers that persist or chart market activity.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ids::ActorId;

/// What produced a book entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Subsidy seeded at market creation.
    InitialLiquidity,
    /// Trader bought shares.
    Buy,
    /// Trader sold shares.
    Sell,
    /// Liquidity added by a provider.
    ProvideLiquidity,
    /// Liquidity withdrawn by a provider.
    RemoveLiquidity,
}

impl EntryKind {
    /// Liquidity events are fee-free and do not count as trading volume.
    #[must_use]
    pub const fn is_liquidity(self) -> bool {
        matches!(
            self,
            Self::InitialLiquidity | Self::ProvideLiquidity | Self::RemoveLiquidity
        )
    }

    /// Stable name used in logs and CLI output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InitialLiquidity => "initial",
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::ProvideLiquidity => "provide",
            Self::RemoveLiquidity => "remove",
        }
    }
}

/// One committed record.
///
/// `shares` is signed: positive when shares enter the outstanding vector,
/// negative when they leave it. `paid` is signed from the market's point of
/// view: positive for collateral paid in, negative for collateral paid out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookEntry {
    /// Position in the book, starting at zero.
    pub seq: usize,
    /// Who triggered the event.
    pub actor: ActorId,
    /// What kind of event this was.
    pub kind: EntryKind,
    /// Outcome index the shares belong to.
    pub outcome: usize,
    /// Signed share delta.
    pub shares: f64,
    /// Signed collateral flow.
    pub paid: f64,
    /// Charge above the marginal price (zero for liquidity events).
    pub fee_cost: f64,
    /// Liquidity-provider flag.
    pub lp: bool,
    /// Commit time.
    pub recorded_at: DateTime<Utc>,
}

impl BookEntry {
    /// Average price per share, or zero for empty records.
    #[must_use]
    pub fn unit_price(&self) -> f64 {
        if self.shares == 0.0 {
            0.0
        } else {
            (self.paid / self.shares).abs()
        }
    }

    /// Absolute share volume moved by this entry.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.shares.abs()
    }
}

/// Fields for an entry that has not been committed yet.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PendingEntry {
    pub actor: ActorId,
    pub kind: EntryKind,
    pub outcome: usize,
    pub shares: f64,
    pub paid: f64,
    pub fee_cost: f64,
}

/// Append-only sequence of book entries.
#[derive(Debug, Clone, Default)]
pub struct Book {
    entries: Vec<BookEntry>,
}

impl Book {
    /// Create an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, liquidity records included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in commit order.
    #[must_use]
    pub fn entries(&self) -> &[BookEntry] {
        &self.entries
    }

    /// Most recent entry.
    #[must_use]
    pub fn last(&self) -> Option<&BookEntry> {
        self.entries.last()
    }

    /// Entries that represent trading (buys and sells).
    pub fn trades(&self) -> impl Iterator<Item = &BookEntry> {
        self.entries.iter().filter(|e| !e.kind.is_liquidity())
    }

    /// Net shares of `outcome` held by traders.
    #[must_use]
    pub fn traded_position(&self, outcome: usize) -> f64 {
        self.trades()
            .filter(|e| e.outcome == outcome)
            .map(|e| e.shares)
            .sum()
    }

    /// Drop entries past `len`. Used to unwind a commit that failed late.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    /// Append entries stamped with consecutive sequence numbers.
    pub(crate) fn append(&mut self, pending: Vec<PendingEntry>) {
        let recorded_at = Utc::now();
        for entry in pending {
            let seq = self.entries.len();
            self.entries.push(BookEntry {
                seq,
                actor: entry.actor,
                lp: entry.kind.is_liquidity(),
                kind: entry.kind,
                outcome: entry.outcome,
                shares: entry.shares,
                paid: entry.paid,
                fee_cost: entry.fee_cost,
                recorded_at,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(kind: EntryKind, outcome: usize, shares: f64, paid: f64) -> PendingEntry {
        PendingEntry {
            actor: ActorId::from("alice"),
            kind,
            outcome,
            shares,
            paid,
            fee_cost: 0.0,
        }
    }

    #[test]
    fn append_assigns_sequence_and_lp_flag() {
        let mut book = Book::new();
        book.append(vec![
            pending(EntryKind::InitialLiquidity, 0, 0.5, 0.5),
            pending(EntryKind::InitialLiquidity, 1, 0.5, 0.5),
        ]);
        book.append(vec![pending(EntryKind::Buy, 0, 0.2, 0.1)]);

        assert_eq!(book.len(), 3);
        let seqs: Vec<usize> = book.entries().iter().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
        assert!(book.entries()[0].lp);
        assert!(!book.entries()[2].lp);
    }

    #[test]
    fn trades_skip_liquidity_records() {
        let mut book = Book::new();
        book.append(vec![
            pending(EntryKind::InitialLiquidity, 0, 0.5, 0.5),
            pending(EntryKind::Buy, 0, 0.2, 0.1),
            pending(EntryKind::ProvideLiquidity, 1, 1.0, 1.0),
            pending(EntryKind::Sell, 0, -0.05, -0.02),
        ]);

        assert_eq!(book.trades().count(), 2);
        assert!((book.traded_position(0) - 0.15).abs() < 1e-12);
        assert_eq!(book.traded_position(1), 0.0);
    }

    #[test]
    fn truncate_unwinds_appended_entries() {
        let mut book = Book::new();
        book.append(vec![pending(EntryKind::Buy, 0, 0.2, 0.1)]);
        let mark = book.len();
        book.append(vec![pending(EntryKind::Sell, 0, -0.2, -0.09)]);
        book.truncate(mark);
        assert_eq!(book.len(), 1);
        assert_eq!(book.last().unwrap().kind, EntryKind::Buy);
    }

    #[test]
    fn unit_price_is_unsigned() {
        let mut book = Book::new();
        book.append(vec![pending(EntryKind::Sell, 0, -2.0, -1.0)]);
        let entry = book.last().unwrap();
        assert!((entry.unit_price() - 0.5).abs() < 1e-12);
        assert!((entry.volume() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn entry_kind_liquidity_classification() {
        assert!(EntryKind::InitialLiquidity.is_liquidity());
        assert!(EntryKind::RemoveLiquidity.is_liquidity());
        assert!(!EntryKind::Buy.is_liquidity());
        assert_eq!(EntryKind::Sell.as_str(), "sell");
    }
}
