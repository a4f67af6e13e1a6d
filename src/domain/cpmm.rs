//! Constant-product outcome pool.
//!
//! The share vector holds pool balances, one per outcome. The pool keeps the
//! product of all balances fixed across trades:
//!
//! - Buy with payment `a`: mint `a * (1 - fee)` of every outcome into the pool,
//!   then release enough of the chosen outcome to restore the product.
//! - Sell `s` shares: put them into the pool, then burn `r` of every outcome so
//!   the product is restored; `r * (1 - fee)` is paid out.
//! - Prices: `p_i = (1 / x_i) / sum_j(1 / x_j)`.
//!
//! Products are handled as sums of logarithms so large outcome sets stay finite.

use super::error::MarketError;
use super::solver::{solve_increasing, SolverConfig};

/// Result of a pool trade, before it is committed.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolTrade {
    /// Pool balances after the trade.
    pub balances: Vec<f64>,
    /// Outcome shares handed to (buy) or taken from (sell) the trader.
    pub shares: f64,
    /// Collateral paid in (buy) or out (sell).
    pub amount: f64,
    /// Swap fee retained by the pool.
    pub fee: f64,
    /// Solver iterations spent, zero for closed-form trades.
    pub iterations: usize,
}

/// Constant-product pricing with a flat swap fee.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantProduct {
    swap_fee: f64,
}

impl ConstantProduct {
    /// Create a pool model.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::Configuration` unless `swap_fee` is in `[0, 1)`.
    pub fn new(swap_fee: f64) -> Result<Self, MarketError> {
        if !(swap_fee >= 0.0 && swap_fee < 1.0) {
            return Err(MarketError::config(
                "swap_fee",
                format!("must be in [0, 1), got {swap_fee}"),
            ));
        }
        Ok(Self { swap_fee })
    }

    /// The swap fee.
    #[must_use]
    pub fn swap_fee(&self) -> f64 {
        self.swap_fee
    }

    /// Outcome probabilities implied by the pool balances.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::DegenerateState` when any balance is not positive.
    pub fn probabilities(&self, balances: &[f64]) -> Result<Vec<f64>, MarketError> {
        ensure_funded(balances)?;
        let inverse: Vec<f64> = balances.iter().map(|x| x.recip()).collect();
        let total: f64 = inverse.iter().sum();
        Ok(inverse.iter().map(|v| v / total).collect())
    }

    /// Buy outcome shares with `payment` collateral.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::DegenerateState` for an unfunded pool.
    pub fn buy(
        &self,
        balances: &[f64],
        outcome: usize,
        payment: f64,
    ) -> Result<PoolTrade, MarketError> {
        ensure_funded(balances)?;
        let minted = payment * (1.0 - self.swap_fee);
        let (released, remaining) = release(balances, outcome, minted);

        let mut next: Vec<f64> = balances.iter().map(|x| x + minted).collect();
        next[outcome] = remaining;

        Ok(PoolTrade {
            balances: next,
            shares: released,
            amount: payment,
            fee: payment - minted,
            iterations: 0,
        })
    }

    /// Sell `shares` of `outcome` back to the pool.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::DegenerateState` for an unfunded pool and
    /// `MarketError::Pricing` if the burn amount cannot be solved.
    pub fn sell(
        &self,
        balances: &[f64],
        outcome: usize,
        shares: f64,
        solver: &SolverConfig,
    ) -> Result<PoolTrade, MarketError> {
        ensure_funded(balances)?;
        let deposited = balances[outcome] + shares;
        let cap = balances
            .iter()
            .enumerate()
            .map(|(j, &x)| if j == outcome { deposited } else { x })
            .fold(f64::INFINITY, f64::min);

        // Find the burn r with (x_o + s - r) * prod_{j != o}(x_j - r) = prod(x).
        let log_product: f64 = balances.iter().map(|x| x.ln()).sum();
        let neg_log_after = |r: f64| -> f64 {
            -balances
                .iter()
                .enumerate()
                .map(|(j, &x)| if j == outcome { deposited - r } else { x - r })
                .map(f64::ln)
                .sum::<f64>()
        };
        let slope = |r: f64| -> f64 {
            balances
                .iter()
                .enumerate()
                .map(|(j, &x)| if j == outcome { deposited - r } else { x - r })
                .map(f64::recip)
                .sum()
        };
        let solution = solve_increasing(solver, -log_product, 0.0, cap, neg_log_after, slope)?;
        let burned = solution.root;

        let next: Vec<f64> = balances
            .iter()
            .enumerate()
            .map(|(j, &x)| if j == outcome { deposited - burned } else { x - burned })
            .collect();
        ensure_funded(&next)?;

        let proceeds = burned * (1.0 - self.swap_fee);
        Ok(PoolTrade {
            balances: next,
            shares,
            amount: proceeds,
            fee: burned - proceeds,
            iterations: solution.iterations,
        })
    }

    /// Collateral needed to receive exactly `shares` of `outcome`.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::Pricing` if the payment cannot be solved.
    pub fn cost_of(
        &self,
        balances: &[f64],
        outcome: usize,
        shares: f64,
        solver: &SolverConfig,
    ) -> Result<f64, MarketError> {
        ensure_funded(balances)?;
        let keep = 1.0 - self.swap_fee;
        let released = |payment: f64| release(balances, outcome, payment * keep).0;
        let slope = |payment: f64| {
            let minted = payment * keep;
            let (_, remaining) = release(balances, outcome, minted);
            let spread: f64 = balances
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != outcome)
                .map(|(_, x)| (x + minted).recip())
                .sum();
            keep * (1.0 + remaining * spread)
        };
        // Every unit of minted collateral releases at least one share.
        let upper = shares / keep;
        Ok(solve_increasing(solver, shares, 0.0, upper, released, slope)?.root)
    }
}

/// Shares released for `minted` collateral and the outcome's remaining balance.
fn release(balances: &[f64], outcome: usize, minted: f64) -> (f64, f64) {
    let log_ratio: f64 = balances
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != outcome)
        .map(|(_, &x)| (x / (x + minted)).ln())
        .sum();
    let remaining = balances[outcome] * log_ratio.exp();
    (balances[outcome] + minted - remaining, remaining)
}

fn ensure_funded(balances: &[f64]) -> Result<(), MarketError> {
    if balances.iter().all(|x| x.is_finite() && *x > 0.0) {
        Ok(())
    } else {
        Err(MarketError::DegenerateState {
            reason: "constant-product pool balances must be positive",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(x: &[f64]) -> f64 {
        x.iter().product()
    }

    #[test]
    fn rejects_fee_out_of_range() {
        assert!(ConstantProduct::new(1.0).is_err());
        assert!(ConstantProduct::new(-0.1).is_err());
        assert!(ConstantProduct::new(0.0).is_ok());
    }

    #[test]
    fn probabilities_favor_scarce_outcome() {
        let pool = ConstantProduct::new(0.0).unwrap();
        let p = pool.probabilities(&[1.0, 3.0]).unwrap();
        assert!((p[0] - 0.75).abs() < 1e-12);
        assert!((p[1] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn buy_preserves_product_and_charges_fee() {
        let pool = ConstantProduct::new(0.02).unwrap();
        let x = [0.5, 0.5, 0.5];
        let trade = pool.buy(&x, 1, 0.1).unwrap();

        assert!((product(&trade.balances) - product(&x)).abs() < 1e-12);
        assert!(trade.shares > 0.1 * 0.98);
        assert!((trade.fee - 0.002).abs() < 1e-12);

        let before = pool.probabilities(&x).unwrap();
        let after = pool.probabilities(&trade.balances).unwrap();
        assert!(after[1] > before[1]);
    }

    #[test]
    fn sell_returns_less_than_bought_with_fee() {
        let pool = ConstantProduct::new(0.02).unwrap();
        let solver = SolverConfig::default();
        let x = [0.5, 0.5];
        let bought = pool.buy(&x, 0, 0.1).unwrap();
        let sold = pool.sell(&bought.balances, 0, bought.shares, &solver).unwrap();

        assert!(sold.amount < 0.1);
        assert!((product(&sold.balances) - product(&x)).abs() < 1e-9);
        assert!(sold.fee > 0.0);
    }

    #[test]
    fn fee_free_round_trip_restores_pool() {
        let pool = ConstantProduct::new(0.0).unwrap();
        let solver = SolverConfig::default();
        let x = [0.4, 0.6, 1.0];
        let bought = pool.buy(&x, 2, 0.25).unwrap();
        let sold = pool.sell(&bought.balances, 2, bought.shares, &solver).unwrap();

        assert!((sold.amount - 0.25).abs() < 1e-9);
        for (a, b) in sold.balances.iter().zip(x.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn cost_of_inverts_buy() {
        let pool = ConstantProduct::new(0.01).unwrap();
        let solver = SolverConfig::default();
        let x = [0.5, 0.8];
        let bought = pool.buy(&x, 0, 0.3).unwrap();
        let cost = pool.cost_of(&x, 0, bought.shares, &solver).unwrap();
        assert!((cost - 0.3).abs() < 1e-9);
    }

    #[test]
    fn unfunded_pool_is_degenerate() {
        let pool = ConstantProduct::new(0.0).unwrap();
        assert!(matches!(
            pool.probabilities(&[0.0, 1.0]),
            Err(MarketError::DegenerateState { .. })
        ));
    }
}
