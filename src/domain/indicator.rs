//! Volume momentum indicator.
//!
//! The ratio of a short moving average to a long moving average of trading
//! volume. A ratio above one means volume is picking up; the liquidity
//! parameter provider turns that into a higher fee.
//!
//! Liquidity events are not trading volume and never enter the series.

use serde::{Deserialize, Serialize};

use super::book::Book;
use super::error::MarketError;

/// Which volume column the indicator averages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeSeries {
    /// Absolute share volume of each trade record.
    #[default]
    PerRecord,
    /// Per record, the sum over outcomes of the latest absolute volume seen for
    /// each outcome (forward-filled, zero before an outcome's first trade).
    OutcomeAggregated,
}

/// Window lengths and series selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorConfig {
    /// Records averaged by the long window.
    pub long_window: usize,
    /// Records averaged by the short window.
    pub short_window: usize,
    /// Volume column to read.
    pub series: VolumeSeries,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            long_window: 5,
            short_window: 1,
            series: VolumeSeries::PerRecord,
        }
    }
}

/// Both window averages and their ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorReading {
    /// Short-window average volume.
    pub short: f64,
    /// Long-window average volume.
    pub long: f64,
    /// `short / long`, or zero when the long window is zero.
    pub ratio: f64,
}

impl IndicatorReading {
    const EMPTY: Self = Self {
        short: 0.0,
        long: 0.0,
        ratio: 0.0,
    };
}

/// Short/long moving-average ratio over the book's trading volume.
#[derive(Debug, Clone)]
pub struct RatioIndicator {
    config: IndicatorConfig,
}

impl RatioIndicator {
    /// Create an indicator.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::Configuration` when a window is zero or the short
    /// window is longer than the long one.
    pub fn new(config: IndicatorConfig) -> Result<Self, MarketError> {
        if config.long_window == 0 {
            return Err(MarketError::config("long_window", "must be at least 1"));
        }
        if config.short_window == 0 {
            return Err(MarketError::config("short_window", "must be at least 1"));
        }
        if config.short_window > config.long_window {
            return Err(MarketError::config(
                "short_window",
                format!(
                    "short window {} exceeds long window {}",
                    config.short_window, config.long_window
                ),
            ));
        }
        Ok(Self { config })
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Read the indicator over a book.
    #[must_use]
    pub fn read_book(&self, book: &Book, outcomes: usize) -> IndicatorReading {
        self.read(&self.volume_series(book, outcomes))
    }

    /// Build the configured volume series from a book.
    #[must_use]
    pub fn volume_series(&self, book: &Book, outcomes: usize) -> Vec<f64> {
        match self.config.series {
            VolumeSeries::PerRecord => book.trades().map(|e| e.volume()).collect(),
            VolumeSeries::OutcomeAggregated => {
                let mut latest = vec![0.0; outcomes];
                book.trades()
                    .filter_map(|e| {
                        let slot = latest.get_mut(e.outcome)?;
                        *slot = e.volume();
                        Some(latest.iter().sum::<f64>())
                    })
                    .collect()
            }
        }
    }

    /// Read the indicator over a raw volume series.
    ///
    /// With fewer than two records both windows collapse to the mean of what is
    /// available; otherwise each window averages its most recent records,
    /// shrinking to the series length when the series is shorter.
    #[must_use]
    pub fn read(&self, volumes: &[f64]) -> IndicatorReading {
        if volumes.is_empty() {
            return IndicatorReading::EMPTY;
        }

        let (short, long) = if volumes.len() < 2 {
            let avg = mean(volumes);
            (avg, avg)
        } else {
            (
                trailing_mean(volumes, self.config.short_window),
                trailing_mean(volumes, self.config.long_window),
            )
        };

        let ratio = if long == 0.0 || !long.is_finite() {
            0.0
        } else {
            short / long
        };

        IndicatorReading { short, long, ratio }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn trailing_mean(values: &[f64], window: usize) -> f64 {
    let start = values.len().saturating_sub(window);
    mean(&values[start..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::{EntryKind, PendingEntry};
    use crate::domain::ids::ActorId;

    fn indicator(long_window: usize, short_window: usize) -> RatioIndicator {
        RatioIndicator::new(IndicatorConfig {
            long_window,
            short_window,
            series: VolumeSeries::PerRecord,
        })
        .unwrap()
    }

    fn entry(kind: EntryKind, outcome: usize, shares: f64) -> PendingEntry {
        PendingEntry {
            actor: ActorId::from("t"),
            kind,
            outcome,
            shares,
            paid: 0.0,
            fee_cost: 0.0,
        }
    }

    #[test]
    fn empty_series_reads_zero() {
        let reading = indicator(5, 1).read(&[]);
        assert_eq!(reading.ratio, 0.0);
        assert_eq!(reading.long, 0.0);
    }

    #[test]
    fn single_record_collapses_to_its_value() {
        let reading = indicator(5, 1).read(&[0.75]);
        assert_eq!(reading.short, 0.75);
        assert_eq!(reading.long, 0.75);
        assert_eq!(reading.ratio, 1.0);
    }

    #[test]
    fn single_zero_record_guards_division() {
        let reading = indicator(5, 1).read(&[0.0]);
        assert_eq!(reading.ratio, 0.0);
    }

    #[test]
    fn windows_use_trailing_records() {
        let reading = indicator(3, 1).read(&[10.0, 1.0, 2.0, 3.0]);
        assert_eq!(reading.short, 3.0);
        assert_eq!(reading.long, 2.0);
        assert_eq!(reading.ratio, 1.5);
    }

    #[test]
    fn long_window_shrinks_to_series_length() {
        let reading = indicator(45, 1).read(&[1.0, 3.0]);
        assert_eq!(reading.long, 2.0);
        assert_eq!(reading.ratio, 1.5);
    }

    #[test]
    fn zero_long_window_average_reads_zero() {
        let reading = indicator(3, 1).read(&[0.0, 0.0, 0.0]);
        assert_eq!(reading.ratio, 0.0);
    }

    #[test]
    fn rejects_bad_windows() {
        let bad = IndicatorConfig {
            long_window: 2,
            short_window: 3,
            series: VolumeSeries::PerRecord,
        };
        assert!(RatioIndicator::new(bad).is_err());
        assert!(RatioIndicator::new(IndicatorConfig {
            long_window: 0,
            ..IndicatorConfig::default()
        })
        .is_err());
    }

    #[test]
    fn per_record_series_ignores_liquidity_and_uses_magnitudes() {
        let mut book = Book::new();
        book.append(vec![
            entry(EntryKind::InitialLiquidity, 0, 0.5),
            entry(EntryKind::Buy, 0, 2.0),
            entry(EntryKind::Sell, 1, -1.0),
            entry(EntryKind::ProvideLiquidity, 1, 4.0),
        ]);
        let series = indicator(5, 1).volume_series(&book, 2);
        assert_eq!(series, vec![2.0, 1.0]);
    }

    #[test]
    fn aggregated_series_forward_fills_outcomes() {
        let mut book = Book::new();
        book.append(vec![
            entry(EntryKind::Buy, 0, 2.0),
            entry(EntryKind::Buy, 1, 1.0),
            entry(EntryKind::Buy, 0, 3.0),
        ]);
        let ind = RatioIndicator::new(IndicatorConfig {
            series: VolumeSeries::OutcomeAggregated,
            ..IndicatorConfig::default()
        })
        .unwrap();
        assert_eq!(ind.volume_series(&book, 2), vec![2.0, 3.0, 4.0]);
    }
}
