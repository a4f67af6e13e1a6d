//! Append-only market state history.
//!
//! Every committed event pushes a new share vector and the probability vector
//! it implies. The current state is always the last snapshot; earlier ones are
//! kept for audit and charting.

/// Share-vector and probability snapshots in commit order.
#[derive(Debug, Clone)]
pub struct StateHistory {
    balances: Vec<Vec<f64>>,
    probabilities: Vec<Vec<f64>>,
}

impl StateHistory {
    /// Start a history from the seeded share vector and its probabilities.
    pub(crate) fn new(balances: Vec<f64>, probabilities: Vec<f64>) -> Self {
        Self {
            balances: vec![balances],
            probabilities: vec![probabilities],
        }
    }

    /// Current share vector.
    #[must_use]
    pub fn current(&self) -> &[f64] {
        // The constructor seeds one snapshot and nothing removes them.
        self.balances.last().map(Vec::as_slice).unwrap_or_default()
    }

    /// Probability vector recorded with the current share vector.
    #[must_use]
    pub fn current_probabilities(&self) -> &[f64] {
        self.probabilities
            .last()
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All share vectors, oldest first.
    #[must_use]
    pub fn balances(&self) -> &[Vec<f64>] {
        &self.balances
    }

    /// All probability vectors, oldest first.
    #[must_use]
    pub fn probabilities(&self) -> &[Vec<f64>] {
        &self.probabilities
    }

    /// Number of snapshots, the seed included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    /// Never true; a history always holds its seed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Sum of the current share vector.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.current().iter().sum()
    }

    pub(crate) fn push(&mut self, balances: Vec<f64>, probabilities: Vec<f64>) {
        self.balances.push(balances);
        self.probabilities.push(probabilities);
    }
}
