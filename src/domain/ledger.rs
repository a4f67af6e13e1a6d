//! Liquidity provision accounting.
//!
//! - [`LiquiditySplit`] - How an amount is spread across outcomes
//! - [`LiquidityLedger`] - Net liquidity provided by each actor
//!
//! Provision and removal are fee-free and never move market value.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::ids::ActorId;

/// How provided or withdrawn liquidity is spread across outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiquiditySplit {
    /// In proportion to outstanding balances, `x_i / sum(x)`.
    ///
    /// Scales the share vector uniformly, so prices do not move.
    #[default]
    Balance,
    /// In proportion to the probability vector, `p_i`.
    ///
    /// Removal splits by the prices at removal time, so providing and then
    /// removing the same amount restores the total but not each balance.
    Price,
}

impl LiquiditySplit {
    /// Per-outcome shares for `amount`.
    #[must_use]
    pub fn allocate(self, amount: f64, balances: &[f64], probabilities: &[f64]) -> Vec<f64> {
        match self {
            Self::Balance => {
                let total: f64 = balances.iter().sum();
                balances.iter().map(|x| amount * x / total).collect()
            }
            Self::Price => probabilities.iter().map(|p| amount * p).collect(),
        }
    }
}

/// Net liquidity per provider.
#[derive(Debug, Clone, Default)]
pub struct LiquidityLedger {
    provided: HashMap<ActorId, f64>,
}

impl LiquidityLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Net amount `actor` has provided and not withdrawn.
    #[must_use]
    pub fn balance(&self, actor: &ActorId) -> f64 {
        self.provided.get(actor).copied().unwrap_or(0.0)
    }

    /// Sum over all providers.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.provided.values().sum()
    }

    /// Providers with a positive balance, sorted by id.
    #[must_use]
    pub fn providers(&self) -> Vec<(&ActorId, f64)> {
        let mut providers: Vec<_> = self
            .provided
            .iter()
            .filter(|(_, &amount)| amount > 0.0)
            .map(|(actor, &amount)| (actor, amount))
            .collect();
        providers.sort_by(|a, b| a.0.cmp(b.0));
        providers
    }

    pub(crate) fn provide(&mut self, actor: &ActorId, amount: f64) {
        *self.provided.entry(actor.clone()).or_insert(0.0) += amount;
    }

    /// Debit a withdrawal. Callers check the balance first.
    pub(crate) fn remove(&mut self, actor: &ActorId, amount: f64) {
        if let Some(balance) = self.provided.get_mut(actor) {
            *balance = (*balance - amount).max(0.0);
            if *balance == 0.0 {
                self.provided.remove(actor);
            }
        }
    }
}
