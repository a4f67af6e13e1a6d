//! Bounded root finder for monotone trade equations.
//!
//! Buying a given payment's worth of shares means solving `price(s) = payment`
//! for `s`, where `price` is strictly increasing. The solver brackets the root,
//! then runs Newton steps that fall back to bisection whenever a step would
//! leave the bracket. Iterations and tolerance are explicit configuration.

use super::error::MarketError;

/// Upper-bracket doublings allowed before giving up.
const MAX_EXPANSIONS: usize = 64;

/// Configuration for the trade solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Maximum iterations after the root is bracketed.
    pub max_iterations: usize,
    /// Accepted residual, relative to `max(1, |target|)`.
    pub tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-12,
        }
    }
}

impl SolverConfig {
    /// Check bounds.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::Configuration` for a zero iteration budget or a
    /// non-positive tolerance.
    pub fn validate(&self) -> Result<(), MarketError> {
        if self.max_iterations == 0 {
            return Err(MarketError::config("max_iterations", "must be at least 1"));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(MarketError::config(
                "tolerance",
                format!("must be positive, got {}", self.tolerance),
            ));
        }
        Ok(())
    }
}

/// A converged root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// The argument that hits the target.
    pub root: f64,
    /// Iterations spent, bracketing excluded.
    pub iterations: usize,
    /// `|f(root) - target|`.
    pub residual: f64,
}

/// Solve `f(s) = target` for an increasing `f`, starting from `[lo, hi]`.
///
/// `slope` is the derivative of `f`, used for Newton steps. The upper end is
/// doubled until it brackets the target.
///
/// # Errors
///
/// Returns `MarketError::Pricing` when the root cannot be bracketed or the
/// residual is still above tolerance after `max_iterations`.
pub fn solve_increasing<F, D>(
    config: &SolverConfig,
    target: f64,
    lo: f64,
    hi: f64,
    f: F,
    slope: D,
) -> Result<Solution, MarketError>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let tol = config.tolerance * target.abs().max(1.0);
    let (mut lo, mut hi) = (lo, hi);

    let g_lo = f(lo) - target;
    if !g_lo.is_finite() || g_lo > tol {
        return Err(MarketError::Pricing {
            iterations: 0,
            residual: g_lo.abs(),
        });
    }
    if g_lo.abs() <= tol {
        return Ok(Solution {
            root: lo,
            iterations: 0,
            residual: g_lo.abs(),
        });
    }

    let mut g_hi = f(hi) - target;
    let mut expansions = 0;
    while g_hi.is_finite() && g_hi < 0.0 {
        if expansions == MAX_EXPANSIONS {
            return Err(MarketError::Pricing {
                iterations: 0,
                residual: g_hi.abs(),
            });
        }
        lo = hi;
        hi *= 2.0;
        g_hi = f(hi) - target;
        expansions += 1;
    }

    let mut s = if g_hi.is_finite() { hi } else { 0.5 * (lo + hi) };
    let mut residual = f64::INFINITY;

    for iteration in 1..=config.max_iterations {
        let g = f(s) - target;
        if g.is_finite() {
            residual = g.abs();
            if residual <= tol {
                return Ok(Solution {
                    root: s,
                    iterations: iteration,
                    residual,
                });
            }
        }

        // Non-finite values only show up past the root.
        if g.is_finite() && g < 0.0 {
            lo = s;
        } else {
            hi = s;
        }

        let d = slope(s);
        let newton = if g.is_finite() && d > 0.0 {
            s - g / d
        } else {
            f64::NAN
        };
        s = if newton > lo && newton < hi {
            newton
        } else {
            0.5 * (lo + hi)
        };
    }

    Err(MarketError::Pricing {
        iterations: config.max_iterations,
        residual,
    })
}
