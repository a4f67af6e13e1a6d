//! Pricing models.
//!
//! A market prices trades with one [`PricingModel`]. Both variants answer the
//! same questions (probabilities, quotes, buy and sell fills) so the trade
//! executor never branches on the model itself.

use super::book::Book;
use super::cpmm::ConstantProduct;
use super::error::MarketError;
use super::fee::{FeeParameters, FeeRegime, LiquidityParameter};
use super::indicator::{IndicatorConfig, IndicatorReading, RatioIndicator};
use super::lmsr;
use super::solver::{solve_increasing, SolverConfig};

/// Model choice and parameters, before validation against an outcome count.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelSpec {
    /// Logarithmic scoring rule with a volume-driven liquidity parameter.
    ScoringRule {
        /// Fee parameters.
        fee: FeeParameters,
        /// Volume indicator windows.
        indicator: IndicatorConfig,
    },
    /// Constant-product pool with a flat swap fee.
    ConstantProduct {
        /// Fraction of each trade retained by the pool, in `[0, 1)`.
        swap_fee: f64,
    },
}

impl Default for ModelSpec {
    fn default() -> Self {
        Self::ScoringRule {
            fee: FeeParameters::default(),
            indicator: IndicatorConfig::default(),
        }
    }
}

impl ModelSpec {
    /// Validate parameters and build the model for `outcomes` outcomes.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::Configuration` for out-of-range parameters.
    pub fn build(&self, outcomes: usize) -> Result<PricingModel, MarketError> {
        match self {
            Self::ScoringRule { fee, indicator } => {
                let indicator = RatioIndicator::new(*indicator)?;
                Ok(PricingModel::ScoringRule(LiquidityParameter::new(
                    *fee, outcomes, indicator,
                )?))
            }
            Self::ConstantProduct { swap_fee } => {
                Ok(PricingModel::ConstantProduct(ConstantProduct::new(*swap_fee)?))
            }
        }
    }
}

/// A planned trade: everything needed to commit it.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    /// Share vector after the trade.
    pub balances: Vec<f64>,
    /// Shares bought or sold, unsigned.
    pub shares: f64,
    /// Collateral paid in (buy) or out (sell), unsigned.
    pub amount: f64,
    /// Charge above the marginal price, or the swap fee.
    pub fee_cost: f64,
    /// Liquidity parameter the trade was priced at, if the model has one.
    pub liquidity: Option<f64>,
    /// Solver iterations, zero for closed-form trades.
    pub iterations: usize,
}

/// Pricing variants behind one quote/buy/sell contract.
#[derive(Debug, Clone)]
pub enum PricingModel {
    /// LMSR with the dynamic liquidity parameter.
    ScoringRule(LiquidityParameter),
    /// Constant-product pool.
    ConstantProduct(ConstantProduct),
}

impl PricingModel {
    /// Stable model name for logs and reports.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ScoringRule(_) => "scoring_rule",
            Self::ConstantProduct(_) => "constant_product",
        }
    }

    /// Current liquidity parameter, `None` for the constant-product pool.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::DegenerateState` if `b` is not positive.
    pub fn liquidity(&self, balances: &[f64], book: &Book) -> Result<Option<f64>, MarketError> {
        match self {
            Self::ScoringRule(provider) => provider.liquidity(balances, book).map(Some),
            Self::ConstantProduct(_) => Ok(None),
        }
    }

    /// Current volume indicator reading, if the model uses one.
    #[must_use]
    pub fn reading(&self, book: &Book, outcomes: usize) -> Option<IndicatorReading> {
        match self {
            Self::ScoringRule(provider) => match provider.coefficient(book, outcomes).1 {
                FeeRegime::Dynamic(reading) => Some(reading),
                FeeRegime::Bootstrap => None,
            },
            Self::ConstantProduct(_) => None,
        }
    }

    /// Outcome probabilities. Sum to one.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::DegenerateState` if the state admits no prices.
    pub fn probabilities(&self, balances: &[f64], book: &Book) -> Result<Vec<f64>, MarketError> {
        match self {
            Self::ScoringRule(provider) => {
                let b = provider.liquidity(balances, book)?;
                Ok(lmsr::probabilities(balances, b))
            }
            Self::ConstantProduct(pool) => pool.probabilities(balances),
        }
    }

    /// Collateral cost of moving `outcome` by `delta` shares.
    ///
    /// Negative deltas quote a sale and return the negated proceeds.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::DegenerateState` for a non-finite price and
    /// `MarketError::Pricing` if a pool quote cannot be solved.
    pub fn quote(
        &self,
        balances: &[f64],
        book: &Book,
        outcome: usize,
        delta: f64,
        solver: &SolverConfig,
    ) -> Result<f64, MarketError> {
        if delta == 0.0 {
            return Ok(0.0);
        }
        let price = match self {
            Self::ScoringRule(provider) => {
                let b = provider.liquidity(balances, book)?;
                lmsr::price(balances, b, outcome, delta)
            }
            Self::ConstantProduct(pool) if delta > 0.0 => {
                pool.cost_of(balances, outcome, delta, solver)?
            }
            Self::ConstantProduct(pool) => -pool.sell(balances, outcome, -delta, solver)?.amount,
        };
        finite_price(price)
    }

    /// Most shares of `outcome` a sell may take back.
    #[must_use]
    pub fn sell_capacity(&self, balances: &[f64], book: &Book, outcome: usize) -> f64 {
        match self {
            Self::ScoringRule(_) => balances[outcome],
            Self::ConstantProduct(_) => book.traded_position(outcome).max(0.0),
        }
    }

    /// Plan a buy of `payment` collateral worth of `outcome`.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::Pricing` when the share solver misses its
    /// tolerance and `MarketError::DegenerateState` for a state without prices.
    pub fn plan_buy(
        &self,
        balances: &[f64],
        book: &Book,
        outcome: usize,
        payment: f64,
        solver: &SolverConfig,
    ) -> Result<Fill, MarketError> {
        match self {
            Self::ScoringRule(provider) => {
                let b = provider.liquidity(balances, book)?;
                let p = lmsr::marginal_price(balances, b, outcome);
                if !(p > 0.0) {
                    return Err(MarketError::DegenerateState {
                        reason: "outcome price underflowed to zero",
                    });
                }

                let cost = |s: f64| lmsr::price(balances, b, outcome, s);
                // Marginal price after buying s shares, in a form that cannot overflow.
                let slope = |s: f64| 1.0 / (1.0 + (1.0 - p) / p * (-s / b).exp());
                let solution = solve_increasing(solver, payment, 0.0, payment / p, cost, slope)?;

                let shares = solution.root;
                let mut next = balances.to_vec();
                next[outcome] += shares;
                Ok(Fill {
                    balances: next,
                    shares,
                    amount: payment,
                    fee_cost: (payment - shares * p).max(0.0),
                    liquidity: Some(b),
                    iterations: solution.iterations,
                })
            }
            Self::ConstantProduct(pool) => {
                let trade = pool.buy(balances, outcome, payment)?;
                Ok(Fill {
                    balances: trade.balances,
                    shares: trade.shares,
                    amount: trade.amount,
                    fee_cost: trade.fee,
                    liquidity: None,
                    iterations: trade.iterations,
                })
            }
        }
    }

    /// Plan a sell of `shares` of `outcome`.
    ///
    /// Does not check sell capacity; the executor does that first.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::DegenerateState` when the sale would empty the
    /// market or produce a non-finite price.
    pub fn plan_sell(
        &self,
        balances: &[f64],
        book: &Book,
        outcome: usize,
        shares: f64,
        solver: &SolverConfig,
    ) -> Result<Fill, MarketError> {
        match self {
            Self::ScoringRule(provider) => {
                let total: f64 = balances.iter().sum();
                if !(total - shares > 0.0) {
                    return Err(MarketError::DegenerateState {
                        reason: "sale would leave no outstanding shares",
                    });
                }

                let b = provider.liquidity(balances, book)?;
                let p = lmsr::marginal_price(balances, b, outcome);
                let proceeds = -finite_price(lmsr::price(balances, b, outcome, -shares))?;

                let mut next = balances.to_vec();
                next[outcome] = (next[outcome] - shares).max(0.0);
                Ok(Fill {
                    balances: next,
                    shares,
                    amount: proceeds,
                    fee_cost: (shares * p - proceeds).max(0.0),
                    liquidity: Some(b),
                    iterations: 0,
                })
            }
            Self::ConstantProduct(pool) => {
                let trade = pool.sell(balances, outcome, shares, solver)?;
                Ok(Fill {
                    balances: trade.balances,
                    shares: trade.shares,
                    amount: trade.amount,
                    fee_cost: trade.fee,
                    liquidity: None,
                    iterations: trade.iterations,
                })
            }
        }
    }
}

fn finite_price(price: f64) -> Result<f64, MarketError> {
    if price.is_finite() {
        Ok(price)
    } else {
        Err(MarketError::DegenerateState {
            reason: "price is not finite",
        })
    }
}
