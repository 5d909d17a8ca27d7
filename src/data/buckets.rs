//! Range bucketing for continuous link metrics.
//!
//! A [`RangeTable`] is an ordered list of inclusive `[lower, upper]` bands,
//! each tagged with the state index an indicator should show when a value
//! falls inside it. Tables are plain configuration: they may contain gaps
//! between bands, and a row whose lower bound exceeds its upper bound simply
//! never matches.

use serde::{Deserialize, Serialize};

use super::StateIndex;

/// State index returned when no band contains the value.
pub const OUT_OF_RANGE: StateIndex = -1;

/// One inclusive band of a [`RangeTable`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketRange {
    pub lower: f64,
    pub upper: f64,
    pub state: StateIndex,
}

impl BucketRange {
    pub const fn new(lower: f64, upper: f64, state: StateIndex) -> Self {
        Self {
            lower,
            upper,
            state,
        }
    }

    /// Whether `value` lies within `[lower, upper]`.
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Ordered table of bands used by [`classify`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RangeTable {
    ranges: Vec<BucketRange>,
}

impl RangeTable {
    pub fn new(ranges: Vec<BucketRange>) -> Self {
        Self { ranges }
    }

    /// Build a table from `(lower, upper, state)` rows.
    pub fn from_rows(rows: &[(f64, f64, StateIndex)]) -> Self {
        Self::new(
            rows.iter()
                .map(|&(lower, upper, state)| BucketRange::new(lower, upper, state))
                .collect(),
        )
    }

    /// Build `bands` evenly spaced bands starting at `start`.
    ///
    /// The first band is `[start, start + width]`; every following band starts
    /// `epsilon` above the previous upper bound, the same way hand-written
    /// tables leave a small gap to keep bands disjoint. States count from 1.
    pub fn uniform(start: f64, width: f64, bands: usize, epsilon: f64) -> Self {
        let ranges = (0..bands)
            .map(|i| {
                let upper = start + width * (i as f64 + 1.0);
                let lower = if i == 0 {
                    start
                } else {
                    start + width * i as f64 + epsilon
                };
                BucketRange::new(lower, upper, i as StateIndex + 1)
            })
            .collect();
        Self { ranges }
    }

    /// The default round-trip latency table, in milliseconds (25 bands).
    pub fn default_latency() -> Self {
        Self::from_rows(&[
            (0.0, 1.25, 1),
            (1.251, 3.75, 2),
            (3.751, 6.25, 3),
            (6.251, 8.75, 4),
            (8.751, 11.25, 5),
            (11.251, 13.75, 6),
            (13.751, 16.25, 7),
            (16.251, 18.75, 8),
            (18.751, 21.25, 9),
            (21.251, 23.75, 10),
            (23.751, 26.25, 11),
            (26.251, 28.75, 12),
            (28.751, 31.25, 13),
            (31.251, 33.75, 14),
            (33.751, 36.25, 15),
            (36.251, 38.75, 16),
            (38.751, 41.25, 17),
            (41.251, 43.75, 18),
            (43.751, 46.25, 19),
            (46.251, 48.75, 20),
            (48.751, 51.25, 21),
            (51.251, 53.75, 22),
            (53.751, 56.25, 23),
            (56.251, 58.75, 24),
            (58.751, 100.0, 25),
        ])
    }

    /// The default packets-per-second table (17 bands).
    ///
    /// Row 15 has an inverted bound pair and therefore never matches; rates in
    /// `(28000, 29000.01)` fall out of range.
    pub fn default_pps() -> Self {
        Self::from_rows(&[
            (0.0, 15000.0, 1),
            (15000.001, 16000.0, 2),
            (16000.001, 17000.0, 3),
            (17000.01, 18000.0, 4),
            (18000.01, 19000.0, 5),
            (19000.01, 20000.0, 6),
            (20000.01, 21000.0, 7),
            (21000.01, 22000.0, 8),
            (22000.01, 23000.0, 9),
            (23000.01, 24000.0, 10),
            (24000.01, 25000.0, 11),
            (25000.01, 26000.0, 12),
            (26000.01, 27000.0, 13),
            (27000.01, 28000.0, 14),
            (38000.01, 29000.0, 15),
            (29000.01, 30000.0, 16),
            (30000.01, 100000.0, 17),
        ])
    }

    pub fn ranges(&self) -> &[BucketRange] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// Map `value` to the state of the first band containing it.
///
/// Returns [`OUT_OF_RANGE`] when no band matches, including for NaN.
pub fn classify(value: f64, table: &RangeTable) -> StateIndex {
    table
        .ranges
        .iter()
        .find(|range| range.contains(value))
        .map_or(OUT_OF_RANGE, |range| range.state)
}
