//! Market state and the trade executor.
//!
//! - [`MarketSpec`] - Everything needed to open a market
//! - [`MarketState`] - Share-vector history, book, ledger and market value
//! - [`Market`] - Owns one `MarketState` and applies trades and liquidity events
//!
//! Every operation runs in two phases. Quoting reads the current state and plans
//! the whole change; committing applies it. A rejected operation never reaches
//! the commit phase, so the state is left exactly as it was.

use serde::Serialize;
use tracing::{debug, info, warn};

use super::book::{Book, EntryKind, PendingEntry};
use super::error::{ensure_positive, MarketError};
use super::history::StateHistory;
use super::ids::{ActorId, MarketId};
use super::ledger::{LiquidityLedger, LiquiditySplit};
use super::model::{Fill, ModelSpec, PricingModel};
use super::outcome::OutcomeSet;
use super::solver::SolverConfig;

/// Default creator of the initial subsidy.
pub const DEFAULT_CREATOR: &str = "zeitgeist";

/// Parameters for opening a market.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSpec {
    /// Market identifier used in logs and reports.
    pub id: MarketId,
    /// Tradeable outcomes.
    pub outcomes: OutcomeSet,
    /// Pricing model and its parameters.
    pub model: ModelSpec,
    /// Subsidy split evenly across outcomes at creation.
    pub initial_liquidity: f64,
    /// Actor credited with the initial subsidy.
    pub creator: ActorId,
    /// Split policy for liquidity provision and removal.
    pub split: LiquiditySplit,
    /// Budget for the share solver.
    pub solver: SolverConfig,
}

impl MarketSpec {
    /// Scoring-rule market over `outcomes` with default parameters.
    #[must_use]
    pub fn new(outcomes: OutcomeSet) -> Self {
        Self {
            id: MarketId::from("market"),
            outcomes,
            model: ModelSpec::default(),
            initial_liquidity: 1.0,
            creator: ActorId::from(DEFAULT_CREATOR),
            split: LiquiditySplit::default(),
            solver: SolverConfig::default(),
        }
    }

    /// Set the market id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<MarketId>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the pricing model.
    #[must_use]
    pub fn with_model(mut self, model: ModelSpec) -> Self {
        self.model = model;
        self
    }

    /// Set the initial subsidy.
    #[must_use]
    pub fn with_initial_liquidity(mut self, amount: f64) -> Self {
        self.initial_liquidity = amount;
        self
    }

    /// Set the creator credited with the initial subsidy.
    #[must_use]
    pub fn with_creator(mut self, creator: impl Into<ActorId>) -> Self {
        self.creator = creator.into();
        self
    }

    /// Set the liquidity split policy.
    #[must_use]
    pub fn with_split(mut self, split: LiquiditySplit) -> Self {
        self.split = split;
        self
    }

    /// Set the solver budget.
    #[must_use]
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }
}

/// Where the executor is in its current operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TradePhase {
    /// No operation in flight; the last one committed.
    #[default]
    Idle,
    /// Reading state and planning the change.
    Quoting,
    /// Applying a planned change.
    Committing,
    /// The last operation was rejected and nothing was applied.
    Rejected,
}

/// Mutable state of one market. Changed only by committed operations.
#[derive(Debug, Clone)]
pub struct MarketState {
    history: StateHistory,
    book: Book,
    ledger: LiquidityLedger,
    market_value: f64,
}

impl MarketState {
    /// Current share vector.
    #[must_use]
    pub fn balances(&self) -> &[f64] {
        self.history.current()
    }

    /// Share-vector and probability history.
    #[must_use]
    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    /// Trade and liquidity records.
    #[must_use]
    pub fn book(&self) -> &Book {
        &self.book
    }

    /// Liquidity provided per actor.
    #[must_use]
    pub fn ledger(&self) -> &LiquidityLedger {
        &self.ledger
    }

    /// Net collateral paid into the market.
    #[must_use]
    pub fn market_value(&self) -> f64 {
        self.market_value
    }
}

/// Point-in-time overview of a market.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSummary {
    /// Market id.
    pub id: MarketId,
    /// Pricing model name.
    pub model: &'static str,
    /// Number of tradeable outcomes.
    pub outcomes: usize,
    /// Net collateral paid in.
    pub market_value: f64,
    /// Current liquidity parameter, when the model has one.
    pub liquidity: Option<f64>,
    /// Current volume ratio, once past warm-up.
    pub ratio: Option<f64>,
    /// Current probabilities.
    pub probabilities: Vec<f64>,
    /// Book entries, liquidity records included.
    pub book_entries: usize,
    /// Buys and sells.
    pub trades: usize,
    /// Net liquidity across providers.
    pub provided_liquidity: f64,
}

/// A single prediction market.
#[derive(Debug, Clone)]
pub struct Market {
    id: MarketId,
    outcomes: OutcomeSet,
    model: PricingModel,
    split: LiquiditySplit,
    solver: SolverConfig,
    creator: ActorId,
    state: MarketState,
    phase: TradePhase,
}

impl Market {
    /// Open a market and seed it with the initial subsidy.
    ///
    /// Each outcome receives `initial_liquidity / n` shares, recorded as one
    /// book entry per outcome attributed to the creator.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::Configuration` if any parameter is out of range.
    pub fn create(spec: MarketSpec) -> Result<Self, MarketError> {
        let MarketSpec {
            id,
            outcomes,
            model,
            initial_liquidity,
            creator,
            split,
            solver,
        } = spec;

        if !(initial_liquidity.is_finite() && initial_liquidity > 0.0) {
            return Err(MarketError::config(
                "initial_liquidity",
                format!("must be positive, got {initial_liquidity}"),
            ));
        }
        solver.validate()?;
        let model = model.build(outcomes.len())?;

        let n = outcomes.len();
        let seed = initial_liquidity / n as f64;
        let balances = vec![seed; n];

        let mut book = Book::new();
        book.append(
            (0..n)
                .map(|outcome| PendingEntry {
                    actor: creator.clone(),
                    kind: EntryKind::InitialLiquidity,
                    outcome,
                    shares: seed,
                    paid: seed,
                    fee_cost: 0.0,
                })
                .collect(),
        );
        let probabilities = model
            .probabilities(&balances, &book)
            .map_err(|_| MarketError::config("initial_liquidity", "too small to price"))?;

        let mut ledger = LiquidityLedger::new();
        ledger.provide(&creator, initial_liquidity);

        info!(
            market_id = %id,
            model = model.name(),
            outcomes = n,
            initial_liquidity,
            creator = %creator,
            "Market created"
        );

        Ok(Self {
            id,
            outcomes,
            model,
            split,
            solver,
            creator,
            state: MarketState {
                history: StateHistory::new(balances, probabilities),
                book,
                ledger,
                market_value: initial_liquidity,
            },
            phase: TradePhase::Idle,
        })
    }

    /// Market id.
    #[must_use]
    pub fn id(&self) -> &MarketId {
        &self.id
    }

    /// Tradeable outcomes.
    #[must_use]
    pub fn outcomes(&self) -> &OutcomeSet {
        &self.outcomes
    }

    /// Pricing model.
    #[must_use]
    pub fn model(&self) -> &PricingModel {
        &self.model
    }

    /// Creator of the initial subsidy.
    #[must_use]
    pub fn creator(&self) -> &ActorId {
        &self.creator
    }

    /// Liquidity split policy.
    #[must_use]
    pub fn split(&self) -> LiquiditySplit {
        self.split
    }

    /// Phase the executor is in; `Rejected` after a failed operation.
    #[must_use]
    pub fn phase(&self) -> TradePhase {
        self.phase
    }

    /// Full market state.
    #[must_use]
    pub fn state(&self) -> &MarketState {
        &self.state
    }

    /// Current share vector.
    #[must_use]
    pub fn balances(&self) -> &[f64] {
        self.state.balances()
    }

    /// Current outcome probabilities.
    #[must_use]
    pub fn probabilities(&self) -> &[f64] {
        self.state.history.current_probabilities()
    }

    /// Trade and liquidity records.
    #[must_use]
    pub fn book(&self) -> &Book {
        &self.state.book
    }

    /// Share-vector and probability history.
    #[must_use]
    pub fn history(&self) -> &StateHistory {
        &self.state.history
    }

    /// Net collateral paid in.
    #[must_use]
    pub fn market_value(&self) -> f64 {
        self.state.market_value
    }

    /// Current liquidity parameter `b`, `None` for the constant-product pool.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::DegenerateState` if `b` is not positive.
    pub fn liquidity(&self) -> Result<Option<f64>, MarketError> {
        self.model.liquidity(self.balances(), self.book())
    }

    /// Price of moving `outcome` by `delta` shares at the current state.
    ///
    /// Read-only; the liquidity parameter is held fixed for the whole quote.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::UnknownOutcome`, `MarketError::InvalidAmount` for
    /// a non-finite delta, or whatever the model reports.
    pub fn quote(&self, outcome: usize, delta: f64) -> Result<f64, MarketError> {
        self.outcomes.check_index(outcome)?;
        if !delta.is_finite() {
            return Err(MarketError::InvalidAmount {
                field: "delta",
                amount: delta,
            });
        }
        self.model
            .quote(self.balances(), self.book(), outcome, delta, &self.solver)
    }

    /// Overview of the current state.
    #[must_use]
    pub fn summary(&self) -> MarketSummary {
        MarketSummary {
            id: self.id.clone(),
            model: self.model.name(),
            outcomes: self.outcomes.len(),
            market_value: self.market_value(),
            liquidity: self.liquidity().ok().flatten(),
            ratio: self
                .model
                .reading(self.book(), self.outcomes.len())
                .map(|r| r.ratio),
            probabilities: self.probabilities().to_vec(),
            book_entries: self.book().len(),
            trades: self.book().trades().count(),
            provided_liquidity: self.state.ledger.total(),
        }
    }

    /// Spend `payment` on shares of `outcome`. Returns the shares issued.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::Pricing` if the share solver misses its tolerance;
    /// the market is unchanged on any error.
    pub fn buy(
        &mut self,
        actor: &ActorId,
        payment: f64,
        outcome: usize,
    ) -> Result<f64, MarketError> {
        self.phase = TradePhase::Quoting;
        let fill = self
            .plan_buy(payment, outcome)
            .map_err(|err| self.reject("buy", actor, err))?;

        let entry = PendingEntry {
            actor: actor.clone(),
            kind: EntryKind::Buy,
            outcome,
            shares: fill.shares,
            paid: fill.amount,
            fee_cost: fill.fee_cost,
        };
        let shares = fill.shares;
        self.commit_trade(actor, fill, entry, payment)?;
        Ok(shares)
    }

    /// Sell `shares` of `outcome`. Returns the proceeds paid out.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::InsufficientShares` when `shares` exceeds what can
    /// be sold back; the market is unchanged on any error.
    pub fn sell(
        &mut self,
        actor: &ActorId,
        shares: f64,
        outcome: usize,
    ) -> Result<f64, MarketError> {
        self.phase = TradePhase::Quoting;
        let fill = self
            .plan_sell(shares, outcome)
            .map_err(|err| self.reject("sell", actor, err))?;

        let entry = PendingEntry {
            actor: actor.clone(),
            kind: EntryKind::Sell,
            outcome,
            shares: -fill.shares,
            paid: -fill.amount,
            fee_cost: fill.fee_cost,
        };
        let proceeds = fill.amount;
        self.commit_trade(actor, fill, entry, -proceeds)?;
        Ok(proceeds)
    }

    /// Add `amount` of liquidity, fee-free. Returns the shares added per outcome.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::InvalidAmount` for a non-positive amount.
    pub fn provide_liquidity(
        &mut self,
        actor: &ActorId,
        amount: f64,
    ) -> Result<Vec<f64>, MarketError> {
        self.phase = TradePhase::Quoting;
        let allocation = ensure_positive("amount", amount)
            .map(|()| self.split.allocate(amount, self.balances(), self.probabilities()))
            .map_err(|err| self.reject("provide_liquidity", actor, err))?;

        let balances: Vec<f64> = self
            .balances()
            .iter()
            .zip(&allocation)
            .map(|(x, add)| x + add)
            .collect();
        let entries = liquidity_entries(actor, EntryKind::ProvideLiquidity, &allocation, 1.0);

        self.commit(balances, entries, 0.0)
            .map_err(|err| self.reject("provide_liquidity", actor, err))?;
        self.state.ledger.provide(actor, amount);

        info!(
            market_id = %self.id,
            actor = %actor,
            amount,
            provided = self.state.ledger.balance(actor),
            "Liquidity provided"
        );
        Ok(allocation)
    }

    /// Withdraw `amount` of previously provided liquidity, split with the same
    /// policy as provision. Returns the shares removed per outcome.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::InsufficientLiquidity` when `amount` exceeds the
    /// actor's net provision, `MarketError::InsufficientShares` when an outcome
    /// balance would go negative, and `MarketError::DegenerateState` when the
    /// market would be left without outstanding shares.
    pub fn remove_liquidity(
        &mut self,
        actor: &ActorId,
        amount: f64,
    ) -> Result<Vec<f64>, MarketError> {
        self.phase = TradePhase::Quoting;
        let (allocation, balances) = self
            .plan_removal(actor, amount)
            .map_err(|err| self.reject("remove_liquidity", actor, err))?;
        let entries = liquidity_entries(actor, EntryKind::RemoveLiquidity, &allocation, -1.0);

        self.commit(balances, entries, 0.0)
            .map_err(|err| self.reject("remove_liquidity", actor, err))?;
        self.state.ledger.remove(actor, amount);

        info!(
            market_id = %self.id,
            actor = %actor,
            amount,
            provided = self.state.ledger.balance(actor),
            "Liquidity removed"
        );
        Ok(allocation)
    }

    fn plan_buy(&self, payment: f64, outcome: usize) -> Result<Fill, MarketError> {
        ensure_positive("payment", payment)?;
        self.outcomes.check_index(outcome)?;
        self.model
            .plan_buy(self.balances(), self.book(), outcome, payment, &self.solver)
    }

    fn plan_sell(&self, shares: f64, outcome: usize) -> Result<Fill, MarketError> {
        ensure_positive("shares", shares)?;
        self.outcomes.check_index(outcome)?;

        let available = self.model.sell_capacity(self.balances(), self.book(), outcome);
        if shares > available {
            return Err(MarketError::InsufficientShares {
                outcome,
                requested: shares,
                available,
            });
        }
        self.model
            .plan_sell(self.balances(), self.book(), outcome, shares, &self.solver)
    }

    fn plan_removal(
        &self,
        actor: &ActorId,
        amount: f64,
    ) -> Result<(Vec<f64>, Vec<f64>), MarketError> {
        ensure_positive("amount", amount)?;
        let available = self.state.ledger.balance(actor);
        if amount > available {
            return Err(MarketError::InsufficientLiquidity {
                actor: actor.clone(),
                requested: amount,
                available,
            });
        }

        let allocation = self
            .split
            .allocate(amount, self.balances(), self.probabilities());
        let mut balances = Vec::with_capacity(allocation.len());
        for (outcome, (&x, &take)) in self.balances().iter().zip(&allocation).enumerate() {
            if take > x {
                return Err(MarketError::InsufficientShares {
                    outcome,
                    requested: take,
                    available: x,
                });
            }
            balances.push(x - take);
        }

        if !(balances.iter().sum::<f64>() > 0.0) {
            return Err(MarketError::DegenerateState {
                reason: "withdrawal would leave no outstanding shares",
            });
        }
        Ok((allocation, balances))
    }

    fn commit_trade(
        &mut self,
        actor: &ActorId,
        fill: Fill,
        entry: PendingEntry,
        value_delta: f64,
    ) -> Result<(), MarketError> {
        let kind = entry.kind;
        let outcome = entry.outcome;
        let Fill {
            balances,
            shares,
            amount,
            fee_cost,
            liquidity,
            iterations,
        } = fill;

        let probabilities = self
            .commit(balances, vec![entry], value_delta)
            .map_err(|err| self.reject(kind.as_str(), actor, err))?;

        debug!(
            market_id = %self.id,
            actor = %actor,
            kind = kind.as_str(),
            outcome,
            shares,
            amount,
            fee_cost,
            b = ?liquidity,
            iterations,
            probability = probabilities.get(outcome).copied().unwrap_or_default(),
            "Trade committed"
        );
        Ok(())
    }

    /// Append the book entries and the new snapshot. The book append is undone
    /// if the new state cannot be priced.
    fn commit(
        &mut self,
        balances: Vec<f64>,
        entries: Vec<PendingEntry>,
        value_delta: f64,
    ) -> Result<Vec<f64>, MarketError> {
        self.phase = TradePhase::Committing;

        let mark = self.state.book.len();
        self.state.book.append(entries);
        let probabilities = match self.model.probabilities(&balances, &self.state.book) {
            Ok(p) => p,
            Err(err) => {
                self.state.book.truncate(mark);
                return Err(err);
            }
        };

        self.state.history.push(balances, probabilities.clone());
        self.state.market_value += value_delta;
        self.phase = TradePhase::Idle;
        Ok(probabilities)
    }

    fn reject(&mut self, op: &str, actor: &ActorId, err: MarketError) -> MarketError {
        self.phase = TradePhase::Rejected;
        warn!(
            market_id = %self.id,
            actor = %actor,
            op,
            error = %err,
            "Operation rejected"
        );
        err
    }
}

fn liquidity_entries(
    actor: &ActorId,
    kind: EntryKind,
    allocation: &[f64],
    sign: f64,
) -> Vec<PendingEntry> {
    allocation
        .iter()
        .enumerate()
        .filter(|(_, &shares)| shares > 0.0)
        .map(|(outcome, &shares)| PendingEntry {
            actor: actor.clone(),
            kind,
            outcome,
            shares: sign * shares,
            paid: sign * shares,
            fee_cost: 0.0,
        })
        .collect()
}
