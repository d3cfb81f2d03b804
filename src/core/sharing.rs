//! Savings from interning repeated text values
//!
//! Every occurrence of a repeated value after the first can be replaced by a
//! shared reference costing `reference_overhead` bytes. A value no longer
//! than the reference itself saves nothing.

use serde::{Deserialize, Serialize};

use super::collector::StringCensus;
use super::estimators::{EstimateDetail, SavingsEstimate, SavingsEstimator};

/// Result of the sharing estimate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharingBreakdown {
    /// Distinct values seen exactly once
    pub singletons: usize,
    /// Distinct values seen more than once
    pub repeated: usize,
    /// Occurrences summed over repeated values
    pub repeated_occurrences: usize,
    /// Bytes saved by replacing repeats with references
    pub saved_bytes: usize,
}

/// Bytes saved for one value seen `count` times
pub fn entry_savings(byte_len: usize, count: usize, reference_overhead: usize) -> usize {
    byte_len.saturating_sub(reference_overhead) * count.saturating_sub(1)
}

/// Estimates interning savings over a census
#[derive(Debug, Clone, Copy)]
pub struct SharingEstimator {
    reference_overhead: usize,
}

impl SharingEstimator {
    pub fn new(reference_overhead: usize) -> Self {
        Self { reference_overhead }
    }

    pub fn breakdown(&self, census: &StringCensus) -> SharingBreakdown {
        let mut breakdown = SharingBreakdown::default();
        for (value, count) in census.entries() {
            if count > 1 {
                breakdown.repeated += 1;
                breakdown.repeated_occurrences += count;
                breakdown.saved_bytes += entry_savings(value.len(), count, self.reference_overhead);
            } else {
                breakdown.singletons += 1;
            }
        }
        breakdown
    }
}

impl SavingsEstimator for SharingEstimator {
    fn name(&self) -> &str {
        "string_sharing"
    }

    fn estimate(&self, census: &StringCensus) -> SavingsEstimate {
        let breakdown = self.breakdown(census);
        SavingsEstimate::new(
            self.name(),
            breakdown.saved_bytes,
            format!(
                "{} repeated values, {} occurrences, {}-byte references",
                breakdown.repeated, breakdown.repeated_occurrences, self.reference_overhead
            ),
            EstimateDetail::Sharing(breakdown),
        )
    }
}
