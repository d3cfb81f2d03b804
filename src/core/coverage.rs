//! Coverage of document text by the constant/label table
//!
//! A text value is *covered* when it equals a declared name in the
//! [`ConstantTable`]. Covered values are candidates for replacement by their
//! declared compact value, so the ranking orders them by the bytes they
//! occupy in the document.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use super::collector::{StringCensus, StringStat};
use super::schema::{Category, ConstantTable};

/// A covered value together with the declaration it matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoveredValue {
    #[serde(flatten)]
    pub stat: StringStat,
    pub category: Category,
    pub declared_value: String,
}

impl CoveredValue {
    /// Bytes this value occupies across all occurrences
    pub fn total_bytes(&self) -> usize {
        self.stat.total_bytes()
    }
}

/// Partition of distinct text values into covered and uncovered
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    /// Covered values in lexicographic order
    pub covered: Vec<CoveredValue>,
    /// Uncovered values in lexicographic order
    pub uncovered: Vec<StringStat>,
    /// Occurrences summed over covered values
    pub covered_occurrences: usize,
    /// `count * byte_len` summed over covered values
    pub covered_bytes: usize,
    /// Covered values ranked by byte contribution, at most `top_n` long
    pub top: Vec<CoveredValue>,
}

impl CoverageReport {
    pub fn covered_count(&self) -> usize {
        self.covered.len()
    }

    pub fn uncovered_count(&self) -> usize {
        self.uncovered.len()
    }

    /// Share of distinct values that are covered (0.0 when there are none)
    pub fn coverage_ratio(&self) -> f64 {
        let distinct = self.covered.len() + self.uncovered.len();
        if distinct == 0 {
            0.0
        } else {
            self.covered.len() as f64 / distinct as f64
        }
    }
}

/// Join the census against the table and rank the covered values
pub fn analyze_coverage(census: &StringCensus, table: &ConstantTable, top_n: usize) -> CoverageReport {
    let mut report = CoverageReport::default();

    for stat in census.stats() {
        match table.get(&stat.value) {
            Some(entry) => {
                report.covered_occurrences += stat.count;
                report.covered_bytes += stat.total_bytes();
                report.covered.push(CoveredValue {
                    category: entry.category,
                    declared_value: entry.value.clone(),
                    stat,
                });
            }
            None => report.uncovered.push(stat),
        }
    }

    // Stable sort keeps lexicographic order among equal contributions
    let mut ranked = report.covered.clone();
    ranked.sort_by_key(|c| Reverse(c.total_bytes()));
    ranked.truncate(top_n);
    report.top = ranked;

    tracing::debug!(
        covered = report.covered.len(),
        uncovered = report.uncovered.len(),
        covered_bytes = report.covered_bytes,
        "coverage analysis complete"
    );
    report
}
