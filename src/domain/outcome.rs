//! Outcome sets.
//!
//! - [`OutcomeSet`] - Ordered, fixed list of distinct outcomes with stable indices
//!
//! A combinatorial market trades every ordered, non-empty selection of its base
//! outcomes ("A", "B", "AB", "BA", ...). The expansion is enumerated once when the
//! set is built, so trade-time code only ever deals with plain indices.

use std::collections::HashSet;

use super::error::MarketError;
use super::ids::OutcomeId;

/// Upper bound on the number of tradeable outcomes in one market.
pub const MAX_OUTCOMES: usize = 4096;

/// Ordered set of distinct outcomes. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeSet {
    outcomes: Vec<OutcomeId>,
    /// Base-outcome indices behind each entry. Singleton for plain markets.
    components: Vec<Vec<usize>>,
}

impl OutcomeSet {
    /// Build a plain outcome set.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::Configuration` with fewer than two outcomes,
    /// duplicates, or more than [`MAX_OUTCOMES`].
    pub fn try_new(outcomes: Vec<OutcomeId>) -> Result<Self, MarketError> {
        validate_base(&outcomes)?;
        if outcomes.len() > MAX_OUTCOMES {
            return Err(MarketError::config(
                "outcomes",
                format!("at most {MAX_OUTCOMES} outcomes are supported"),
            ));
        }

        let components = (0..outcomes.len()).map(|i| vec![i]).collect();
        Ok(Self {
            outcomes,
            components,
        })
    }

    /// Build the permutation-expanded outcome set over `base`.
    ///
    /// Entries are ordered by selection size, then lexicographically by base
    /// index, so indices are stable for a given base list.
    ///
    /// # Errors
    ///
    /// Same as [`OutcomeSet::try_new`], checked against the expanded size.
    pub fn combinatorial(base: Vec<OutcomeId>) -> Result<Self, MarketError> {
        validate_base(&base)?;

        let expanded = expanded_len(base.len());
        if expanded.map_or(true, |len| len > MAX_OUTCOMES) {
            return Err(MarketError::config(
                "outcomes",
                format!(
                    "{} base outcomes expand past {MAX_OUTCOMES} combinations",
                    base.len()
                ),
            ));
        }

        let mut components = Vec::with_capacity(expanded.unwrap_or_default());
        for size in 1..=base.len() {
            let mut current = Vec::with_capacity(size);
            let mut used = vec![false; base.len()];
            arrangements(base.len(), size, &mut current, &mut used, &mut components);
        }

        let outcomes: Vec<OutcomeId> = components
            .iter()
            .map(|selection| {
                let label: String = selection.iter().map(|&i| base[i].as_str()).collect();
                OutcomeId::new(label)
            })
            .collect();

        // Labels are concatenated, so ["A", "B", "AB"] yields "AB" twice.
        if let Some(label) = first_duplicate(&outcomes) {
            return Err(MarketError::config(
                "outcomes",
                format!("combination label '{label}' is ambiguous"),
            ));
        }

        Ok(Self {
            outcomes,
            components,
        })
    }

    /// Number of tradeable outcomes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Always false; an outcome set holds at least two outcomes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Outcome at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&OutcomeId> {
        self.outcomes.get(index)
    }

    /// Index of the outcome with the given id.
    #[must_use]
    pub fn index_of(&self, id: &OutcomeId) -> Option<usize> {
        self.outcomes.iter().position(|o| o == id)
    }

    /// Base-outcome indices that make up entry `index`.
    #[must_use]
    pub fn components(&self, index: usize) -> Option<&[usize]> {
        self.components.get(index).map(Vec::as_slice)
    }

    /// Iterate over outcomes in index order.
    pub fn iter(&self) -> impl Iterator<Item = &OutcomeId> {
        self.outcomes.iter()
    }

    /// Check that `index` addresses an outcome.
    pub(crate) fn check_index(&self, index: usize) -> Result<(), MarketError> {
        if index < self.len() {
            Ok(())
        } else {
            Err(MarketError::UnknownOutcome {
                index,
                count: self.len(),
            })
        }
    }
}

fn validate_base(outcomes: &[OutcomeId]) -> Result<(), MarketError> {
    if outcomes.len() < 2 {
        return Err(MarketError::config(
            "outcomes",
            format!("at least 2 outcomes required, got {}", outcomes.len()),
        ));
    }

    match first_duplicate(outcomes) {
        Some(outcome) => Err(MarketError::config(
            "outcomes",
            format!("duplicate outcome '{outcome}'"),
        )),
        None => Ok(()),
    }
}

fn first_duplicate(outcomes: &[OutcomeId]) -> Option<&OutcomeId> {
    let mut seen = HashSet::with_capacity(outcomes.len());
    outcomes.iter().find(|outcome| !seen.insert(*outcome))
}

/// sum_{k=1..n} n! / (n-k)!, or None on overflow.
fn expanded_len(n: usize) -> Option<usize> {
    let mut total = 0usize;
    let mut term = 1usize;
    for k in 0..n {
        term = term.checked_mul(n - k)?;
        total = total.checked_add(term)?;
    }
    Some(total)
}

fn arrangements(
    n: usize,
    size: usize,
    current: &mut Vec<usize>,
    used: &mut [bool],
    out: &mut Vec<Vec<usize>>,
) {
    if current.len() == size {
        out.push(current.clone());
        return;
    }
    for i in 0..n {
        if used[i] {
            continue;
        }
        used[i] = true;
        current.push(i);
        arrangements(n, size, current, used, out);
        current.pop();
        used[i] = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<OutcomeId> {
        names.iter().map(|n| OutcomeId::from(*n)).collect()
    }

    #[test]
    fn rejects_single_outcome() {
        let err = OutcomeSet::try_new(ids(&["Yes"])).unwrap_err();
        assert!(matches!(
            err,
            MarketError::Configuration {
                field: "outcomes",
                ..
            }
        ));
    }

    #[test]
    fn rejects_duplicates() {
        assert!(OutcomeSet::try_new(ids(&["Yes", "No", "Yes"])).is_err());
    }

    #[test]
    fn plain_set_keeps_order() {
        let set = OutcomeSet::try_new(ids(&["A", "B", "C"])).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.get(1).unwrap().as_str(), "B");
        assert_eq!(set.index_of(&OutcomeId::from("C")), Some(2));
        assert_eq!(set.components(2), Some(&[2usize][..]));
    }

    #[test]
    fn combinatorial_expands_all_arrangements() {
        let set = OutcomeSet::combinatorial(ids(&["A", "B", "C"])).unwrap();
        // 3 singles + 6 ordered pairs + 6 orderings of all three
        assert_eq!(set.len(), 15);

        let labels: Vec<&str> = set.iter().map(OutcomeId::as_str).collect();
        assert_eq!(&labels[..3], &["A", "B", "C"]);
        assert_eq!(&labels[3..9], &["AB", "AC", "BA", "BC", "CA", "CB"]);
        assert_eq!(labels[9], "ABC");
        assert_eq!(labels[14], "CBA");
        assert_eq!(set.components(5), Some(&[1usize, 0][..]));
    }

    #[test]
    fn combinatorial_is_stable() {
        let a = OutcomeSet::combinatorial(ids(&["X", "Y"])).unwrap();
        let b = OutcomeSet::combinatorial(ids(&["X", "Y"])).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 4);
    }

    #[test]
    fn combinatorial_rejects_explosion() {
        let names: Vec<String> = (0..8).map(|i| format!("o{i}")).collect();
        let base = names.iter().map(|n| OutcomeId::from(n.as_str())).collect();
        assert!(OutcomeSet::combinatorial(base).is_err());
    }

    #[test]
    fn combinatorial_rejects_colliding_labels() {
        let err = OutcomeSet::combinatorial(ids(&["A", "B", "AB"])).unwrap_err();
        assert!(matches!(
            err,
            MarketError::Configuration {
                field: "outcomes",
                ..
            }
        ));
        assert!(err.to_string().contains("'AB'"));
    }

    #[test]
    fn expanded_len_matches_known_values() {
        assert_eq!(expanded_len(2), Some(4));
        assert_eq!(expanded_len(3), Some(15));
        assert_eq!(expanded_len(4), Some(64));
        assert_eq!(expanded_len(7), Some(13699));
    }

    #[test]
    fn check_index_reports_count() {
        let set = OutcomeSet::try_new(ids(&["Yes", "No"])).unwrap();
        assert!(set.check_index(1).is_ok());
        assert_eq!(
            set.check_index(2),
            Err(MarketError::UnknownOutcome { index: 2, count: 2 })
        );
    }
}
