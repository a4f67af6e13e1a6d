//! Dynamic liquidity parameter.
//!
//! The scoring rule's liquidity parameter is `b = f * sum(x)`, where the fee
//! coefficient `f` starts at the base fee `alpha = vig * n / ln(n)` and then
//! follows the volume ratio `r` along a sigmoid-shaped curve:
//!
//! ```text
//! f(r) = alpha + p1 * r / sqrt(p2 + r^p3)        floored at alpha * mrc
//! ```
//!
//! `b` is derived on every call and never stored.

use super::book::Book;
use super::error::MarketError;
use super::indicator::{IndicatorReading, RatioIndicator};

/// Fee parameters fixed at market creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeParameters {
    /// Vigorish, in `(0, 1)`.
    pub vig: f64,
    /// Curve shape `[p1, p2, p3]`.
    pub curve: [f64; 3],
    /// Minimum revenue coefficient, in `(0, 1]`.
    pub min_revenue: f64,
    /// Trades required before the dynamic curve applies.
    pub warmup: usize,
}

impl Default for FeeParameters {
    fn default() -> Self {
        Self {
            vig: 0.1,
            curve: [0.01, 6.0, 2.0],
            min_revenue: 0.4,
            warmup: 1,
        }
    }
}

impl FeeParameters {
    /// Build parameters from a curve given as a slice.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::Configuration` when the curve does not have
    /// exactly three parameters or any value is out of bounds.
    pub fn try_new(
        vig: f64,
        curve: &[f64],
        min_revenue: f64,
        warmup: usize,
    ) -> Result<Self, MarketError> {
        let curve: [f64; 3] = curve.try_into().map_err(|_| {
            MarketError::config(
                "fee_curve",
                format!("expected 3 parameters, got {}", curve.len()),
            )
        })?;
        let params = Self {
            vig,
            curve,
            min_revenue,
            warmup,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check every bound.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::Configuration` naming the first bad field.
    pub fn validate(&self) -> Result<(), MarketError> {
        if !(self.vig > 0.0 && self.vig < 1.0) {
            return Err(MarketError::config(
                "vig",
                format!("must be in (0, 1), got {}", self.vig),
            ));
        }
        if !(self.min_revenue > 0.0 && self.min_revenue <= 1.0) {
            return Err(MarketError::config(
                "min_revenue",
                format!("must be in (0, 1], got {}", self.min_revenue),
            ));
        }
        let [p1, p2, p3] = self.curve;
        if !p1.is_finite() {
            return Err(MarketError::config("fee_curve", "param_1 must be finite"));
        }
        if !(p2.is_finite() && p2 > 0.0) {
            return Err(MarketError::config(
                "fee_curve",
                format!("param_2 must be positive, got {p2}"),
            ));
        }
        if !(p3.is_finite() && p3 >= 0.0) {
            return Err(MarketError::config(
                "fee_curve",
                format!("param_3 must be non-negative, got {p3}"),
            ));
        }
        Ok(())
    }
}

/// Base fee `alpha = vig * n / ln(n)` for `n` outcomes.
#[must_use]
pub fn base_fee(vig: f64, outcomes: usize) -> f64 {
    let n = outcomes as f64;
    vig * n / n.ln()
}

/// Which regime produced a fee coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeeRegime {
    /// Fewer trades than the warm-up threshold: flat base fee.
    Bootstrap,
    /// Dynamic curve over the volume ratio.
    Dynamic(IndicatorReading),
}

/// Computes the liquidity parameter from the share vector and the book.
#[derive(Debug, Clone)]
pub struct LiquidityParameter {
    params: FeeParameters,
    alpha: f64,
    indicator: RatioIndicator,
}

impl LiquidityParameter {
    /// Create a provider for a market with `outcomes` outcomes.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::Configuration` for invalid fee parameters or
    /// fewer than two outcomes.
    pub fn new(
        params: FeeParameters,
        outcomes: usize,
        indicator: RatioIndicator,
    ) -> Result<Self, MarketError> {
        params.validate()?;
        if outcomes < 2 {
            return Err(MarketError::config(
                "outcomes",
                format!("at least 2 outcomes required, got {outcomes}"),
            ));
        }
        Ok(Self {
            alpha: base_fee(params.vig, outcomes),
            params,
            indicator,
        })
    }

    /// The base fee `alpha`.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// The fee parameters.
    #[must_use]
    pub fn params(&self) -> &FeeParameters {
        &self.params
    }

    /// The volume indicator.
    #[must_use]
    pub fn indicator(&self) -> &RatioIndicator {
        &self.indicator
    }

    /// Lowest coefficient the market may ever charge.
    #[must_use]
    pub fn floor(&self) -> f64 {
        self.alpha * self.params.min_revenue
    }

    /// Fee coefficient for volume ratio `r`, floored at `alpha * mrc`.
    #[must_use]
    pub fn fee_coefficient(&self, ratio: f64) -> f64 {
        let [p1, p2, p3] = self.params.curve;
        let r = ratio.max(0.0);
        let dynamic = self.alpha + p1 * r / (p2 + r.powf(p3)).sqrt();
        if dynamic.is_finite() {
            dynamic.max(self.floor())
        } else {
            self.floor()
        }
    }

    /// Fee coefficient for the current book and the regime that produced it.
    ///
    /// Warm-up counts buys and sells only, so liquidity events never switch
    /// the regime.
    #[must_use]
    pub fn coefficient(&self, book: &Book, outcomes: usize) -> (f64, FeeRegime) {
        if book.trades().count() < self.params.warmup {
            return (self.alpha, FeeRegime::Bootstrap);
        }
        let reading = self.indicator.read_book(book, outcomes);
        (
            self.fee_coefficient(reading.ratio),
            FeeRegime::Dynamic(reading),
        )
    }

    /// Liquidity parameter `b = f * sum(x)`.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::DegenerateState` when `sum(x)` is not positive or
    /// the result is not a positive finite number.
    pub fn liquidity(&self, balances: &[f64], book: &Book) -> Result<f64, MarketError> {
        let total: f64 = balances.iter().sum();
        if !(total.is_finite() && total > 0.0) {
            return Err(MarketError::DegenerateState {
                reason: "sum of outstanding shares must be positive",
            });
        }

        let (coefficient, _) = self.coefficient(book, balances.len());
        let b = coefficient * total;
        if b.is_finite() && b > 0.0 {
            Ok(b)
        } else {
            Err(MarketError::DegenerateState {
                reason: "liquidity parameter must be positive and finite",
            })
        }
    }
}
