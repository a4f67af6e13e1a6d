//! Shared market handle.
//!
//! A [`MarketHandle`] owns one market behind a single reader-writer lock. Trades
//! and liquidity events hold the write lock for their whole quote-and-commit
//! sequence; reads hold the read lock and see one consistent snapshot.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};

use super::book::BookEntry;
use super::error::MarketError;
use super::fee::FeeParameters;
use super::ids::{ActorId, OutcomeId};
use super::indicator::IndicatorConfig;
use super::market::{Market, MarketSpec, MarketSummary};
use super::model::ModelSpec;
use super::outcome::OutcomeSet;

/// Cloneable, thread-safe handle to one market.
#[derive(Debug, Clone)]
pub struct MarketHandle {
    inner: Arc<RwLock<Market>>,
}

impl MarketHandle {
    /// Open a market from a full spec.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::Configuration` for invalid parameters.
    pub fn open(spec: MarketSpec) -> Result<Self, MarketError> {
        Ok(Self::from_market(Market::create(spec)?))
    }

    /// Wrap an existing market.
    #[must_use]
    pub fn from_market(market: Market) -> Self {
        Self {
            inner: Arc::new(RwLock::new(market)),
        }
    }

    /// Buy shares of `outcome` for `payment`. Returns the shares issued.
    ///
    /// # Errors
    ///
    /// See [`Market::buy`].
    pub fn buy(&self, actor: &ActorId, payment: f64, outcome: usize) -> Result<f64, MarketError> {
        self.inner.write().buy(actor, payment, outcome)
    }

    /// Sell shares of `outcome`. Returns the proceeds.
    ///
    /// # Errors
    ///
    /// See [`Market::sell`].
    pub fn sell(&self, actor: &ActorId, shares: f64, outcome: usize) -> Result<f64, MarketError> {
        self.inner.write().sell(actor, shares, outcome)
    }

    /// Provide liquidity. Returns the shares added per outcome.
    ///
    /// # Errors
    ///
    /// See [`Market::provide_liquidity`].
    pub fn provide_liquidity(&self, actor: &ActorId, amount: f64) -> Result<Vec<f64>, MarketError> {
        self.inner.write().provide_liquidity(actor, amount)
    }

    /// Withdraw liquidity. Returns the shares removed per outcome.
    ///
    /// # Errors
    ///
    /// See [`Market::remove_liquidity`].
    pub fn remove_liquidity(&self, actor: &ActorId, amount: f64) -> Result<Vec<f64>, MarketError> {
        self.inner.write().remove_liquidity(actor, amount)
    }

    /// Read-only price of moving `outcome` by `delta` shares.
    ///
    /// # Errors
    ///
    /// See [`Market::quote`].
    pub fn quote(&self, outcome: usize, delta: f64) -> Result<f64, MarketError> {
        self.inner.read().quote(outcome, delta)
    }

    /// Current probabilities.
    #[must_use]
    pub fn probabilities(&self) -> Vec<f64> {
        self.inner.read().probabilities().to_vec()
    }

    /// Copy of the book.
    #[must_use]
    pub fn book(&self) -> Vec<BookEntry> {
        self.inner.read().book().entries().to_vec()
    }

    /// Current overview.
    #[must_use]
    pub fn summary(&self) -> MarketSummary {
        self.inner.read().summary()
    }

    /// Borrow the market for several reads against one snapshot.
    pub fn read(&self) -> RwLockReadGuard<'_, Market> {
        self.inner.read()
    }
}

/// Open a scoring-rule market over `outcomes` with an `init` subsidy.
///
/// `params` is the fee curve `[param_1, param_2, param_3]`; everything else
/// uses defaults.
///
/// # Errors
///
/// Returns `MarketError::Configuration` for fewer than two outcomes, `vig` or
/// `mrc` out of range, a curve that is not three parameters, or a
/// non-positive subsidy.
pub fn create_market(
    outcomes: Vec<OutcomeId>,
    vig: f64,
    params: &[f64],
    mrc: f64,
    init: f64,
) -> Result<MarketHandle, MarketError> {
    let defaults = FeeParameters::default();
    let fee = FeeParameters::try_new(vig, params, mrc, defaults.warmup)?;
    let spec = MarketSpec::new(OutcomeSet::try_new(outcomes)?)
        .with_model(ModelSpec::ScoringRule {
            fee,
            indicator: IndicatorConfig::default(),
        })
        .with_initial_liquidity(init);
    MarketHandle::open(spec)
}
