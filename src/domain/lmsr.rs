//! Logarithmic market scoring rule.
//!
//! - Cost function: `C(x) = b * ln(sum(exp(x_i / b)))`
//! - Prices: `p_i = exp(x_i / b) / sum_j(exp(x_j / b))`
//! - Incremental price of a trade: `C(x + delta * e_i) - C(x)`
//!
//! All exponentials are taken after subtracting the largest `x_i / b`, so large
//! share balances never overflow.

/// Evaluate the cost function at `x` for liquidity `b`.
///
/// Returns NaN for an empty vector or a non-positive `b`.
#[must_use]
pub fn cost(x: &[f64], b: f64) -> f64 {
    if x.is_empty() || !(b > 0.0) {
        return f64::NAN;
    }

    let max = x.iter().fold(f64::NEG_INFINITY, |m, &xi| m.max(xi / b));
    let sum_exp: f64 = x.iter().map(|&xi| (xi / b - max).exp()).sum();

    b * (max + sum_exp.ln())
}

/// Outcome probabilities (softmax of `x / b`). Sums to one.
///
/// Returns an empty vector for an empty input or a non-positive `b`.
#[must_use]
pub fn probabilities(x: &[f64], b: f64) -> Vec<f64> {
    if x.is_empty() || !(b > 0.0) {
        return vec![];
    }

    let max = x.iter().fold(f64::NEG_INFINITY, |m, &xi| m.max(xi / b));
    let exps: Vec<f64> = x.iter().map(|&xi| (xi / b - max).exp()).collect();
    let sum_exp: f64 = exps.iter().sum();

    exps.iter().map(|e| e / sum_exp).collect()
}

/// Marginal price of a single outcome.
#[must_use]
pub fn marginal_price(x: &[f64], b: f64, outcome: usize) -> f64 {
    probabilities(x, b).get(outcome).copied().unwrap_or(f64::NAN)
}

/// Cost of moving `x[outcome]` by `delta` at fixed `b`.
///
/// Positive deltas cost the trader; negative deltas pay out (the result is
/// negative). Computed as a single log-sum-exp difference so small trades on
/// large balances keep their precision.
#[must_use]
pub fn price(x: &[f64], b: f64, outcome: usize, delta: f64) -> f64 {
    if outcome >= x.len() || !(b > 0.0) {
        return f64::NAN;
    }
    if delta == 0.0 {
        return 0.0;
    }

    // C(x') - C(x) = b * ln(1 + p_i * (exp(delta / b) - 1))
    let p = marginal_price(x, b, outcome);
    b * (p * (delta / b).exp_m1()).ln_1p()
}
