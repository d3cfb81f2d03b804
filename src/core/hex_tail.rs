//! Savings from storing long hexadecimal tails as raw bytes
//!
//! Many identifiers end in a content hash spelled out as hex digits. Two hex
//! characters decode to one byte, so a tail of `n` characters stored as a
//! byte string costs about half as much. Only the longest trailing run is
//! considered, and only when it reaches the configured minimum length.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::collector::StringCensus;
use super::estimators::{EstimateDetail, SavingsEstimate, SavingsEstimator};

/// Histogram of tail lengths and the resulting estimate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexTailBreakdown {
    /// Tail length in characters -> number of distinct values with that tail
    pub buckets: BTreeMap<usize, usize>,
    /// Estimated bytes saved over all buckets
    pub saved_bytes: usize,
}

impl HexTailBreakdown {
    /// Number of distinct values carrying a qualifying tail
    pub fn values_with_tail(&self) -> usize {
        self.buckets.values().sum()
    }
}

/// Length of the trailing run of ASCII hex digits in `text`
pub fn hex_tail_len(text: &str) -> usize {
    text.bytes().rev().take_while(|b| b.is_ascii_hexdigit()).count()
}

/// Estimated savings for `count` distinct values with a `tail_len` tail
pub fn bucket_savings(tail_len: usize, count: usize, reference_overhead: usize) -> usize {
    tail_len.saturating_sub(reference_overhead) * count / 2
}

/// Estimates hex-tail savings over a census
#[derive(Debug, Clone, Copy)]
pub struct HexTailEstimator {
    reference_overhead: usize,
    min_tail: usize,
}

impl HexTailEstimator {
    pub fn new(reference_overhead: usize, min_tail: usize) -> Self {
        Self {
            reference_overhead,
            min_tail,
        }
    }

    pub fn breakdown(&self, census: &StringCensus) -> HexTailBreakdown {
        let mut breakdown = HexTailBreakdown::default();
        for (value, _) in census.entries() {
            let tail = hex_tail_len(value);
            if tail >= self.min_tail {
                *breakdown.buckets.entry(tail).or_insert(0) += 1;
            }
        }
        breakdown.saved_bytes = breakdown
            .buckets
            .iter()
            .map(|(&len, &count)| bucket_savings(len, count, self.reference_overhead))
            .sum();
        breakdown
    }
}

impl SavingsEstimator for HexTailEstimator {
    fn name(&self) -> &str {
        "hex_tails"
    }

    fn estimate(&self, census: &StringCensus) -> SavingsEstimate {
        let breakdown = self.breakdown(census);
        SavingsEstimate::new(
            self.name(),
            breakdown.saved_bytes,
            format!(
                "{} values with a tail of {}+ hex digits",
                breakdown.values_with_tail(),
                self.min_tail
            ),
            EstimateDetail::HexTail(breakdown),
        )
    }
}
