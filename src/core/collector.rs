//! String frequency census
//!
//! [`StringCensus`] aggregates the text leaves produced by the visitor into
//! one [`StringStat`] per distinct value. The census is built incrementally
//! during traversal and read-only afterwards.
//!
//! The per-value counts must add up to the number of recorded occurrences.
//! [`StringCensus::verify`] checks this and reports a violation as a fatal
//! internal fault rather than letting a wrong report through.

use std::collections::BTreeMap;

use ciborium::Value;
use serde::{Deserialize, Serialize};

use super::error::{AuditError, Result};
use super::visitor::visit_text;

/// Frequency record for one distinct text value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringStat {
    /// The exact text value
    pub value: String,
    /// Number of occurrences in the document (always >= 1)
    pub count: usize,
}

impl StringStat {
    /// UTF-8 byte length of the value
    pub fn byte_len(&self) -> usize {
        self.value.len()
    }

    /// Bytes contributed by all occurrences together
    pub fn total_bytes(&self) -> usize {
        self.count * self.byte_len()
    }
}

/// Averages over the census; only defined when at least one value was seen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CensusAverages {
    /// Mean byte size per occurrence
    pub bytes_per_string: f64,
    /// Mean number of occurrences per distinct value
    pub occurrences_per_value: f64,
}

/// Occurrence counts and sizes for every distinct text value in a document
#[derive(Debug, Clone, Default)]
pub struct StringCensus {
    counts: BTreeMap<String, usize>,
    total_strings: usize,
    total_string_size: usize,
}

impl StringCensus {
    /// Create an empty census
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk `root` and record every text leaf
    pub fn from_value(root: &Value) -> Self {
        let mut census = Self::new();
        let nodes = visit_text(root, |text| census.record(text));
        tracing::debug!(
            nodes,
            strings = census.total_strings,
            distinct = census.distinct_count(),
            "text census complete"
        );
        census
    }

    /// Record one occurrence of `text`
    pub fn record(&mut self, text: &str) {
        match self.counts.get_mut(text) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(text.to_string(), 1);
            }
        }
        self.total_strings += 1;
        self.total_string_size += text.len();
    }

    /// Total number of text occurrences
    pub fn total_strings(&self) -> usize {
        self.total_strings
    }

    /// Total bytes across all text occurrences
    pub fn total_string_size(&self) -> usize {
        self.total_string_size
    }

    /// Number of distinct text values
    pub fn distinct_count(&self) -> usize {
        self.counts.len()
    }

    /// True when the document held no text at all
    pub fn is_empty(&self) -> bool {
        self.total_strings == 0
    }

    /// Occurrence count of one value (0 if never seen)
    pub fn count_of(&self, text: &str) -> usize {
        self.counts.get(text).copied().unwrap_or(0)
    }

    /// Per-value statistics in lexicographic key order
    pub fn stats(&self) -> impl Iterator<Item = StringStat> + '_ {
        self.counts.iter().map(|(value, &count)| StringStat {
            value: value.clone(),
            count,
        })
    }

    /// Borrowing view of (value, count) pairs in lexicographic key order
    pub fn entries(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.counts.iter().map(|(value, &count)| (value.as_str(), count))
    }

    /// Averages, or `None` when no text values were found
    pub fn averages(&self) -> Option<CensusAverages> {
        if self.total_strings == 0 {
            return None;
        }
        Some(CensusAverages {
            bytes_per_string: self.total_string_size as f64 / self.total_strings as f64,
            occurrences_per_value: self.total_strings as f64 / self.counts.len() as f64,
        })
    }

    /// Check that the per-value counts add up to the occurrence total
    pub fn verify(&self) -> Result<()> {
        let recorded: usize = self.counts.values().sum();
        if recorded != self.total_strings {
            return Err(AuditError::InvariantViolation {
                counted: self.total_strings,
                recorded,
            });
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn corrupt_total_for_test(&mut self, delta: usize) {
        self.total_strings += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn census_of(values: &[&str]) -> StringCensus {
        let mut census = StringCensus::new();
        for v in values {
            census.record(v);
        }
        census
    }

    #[test]
    fn test_empty_census_has_no_averages() {
        let census = StringCensus::new();
        assert!(census.is_empty());
        assert_eq!(census.averages(), None);
        assert!(census.verify().is_ok());
    }

    #[test]
    fn test_counts_and_sizes() {
        let census = census_of(&["X", "YY", "YY", "YY"]);
        assert_eq!(census.total_strings(), 4);
        assert_eq!(census.distinct_count(), 2);
        assert_eq!(census.total_string_size(), 7);
        assert_eq!(census.count_of("YY"), 3);
        assert_eq!(census.count_of("missing"), 0);
        census.verify().unwrap();
    }

    #[test]
    fn test_averages() {
        let census = census_of(&["X", "YY", "YY", "YY"]);
        let averages = census.averages().unwrap();
        assert!((averages.bytes_per_string - 1.75).abs() < f64::EPSILON);
        assert!((averages.occurrences_per_value - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_byte_length_is_utf8() {
        let census = census_of(&["héllo"]);
        let stat = census.stats().next().unwrap();
        assert_eq!(stat.byte_len(), 6);
        assert_eq!(census.total_string_size(), 6);
    }

    #[test]
    fn test_stats_sorted_by_key() {
        let census = census_of(&["b", "a", "c", "a"]);
        let keys: Vec<_> = census.stats().map(|s| s.value).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_from_value() {
        let doc = Value::Map(vec![(
            Value::Text("k".into()),
            Value::Array(vec![Value::Text("v".into()), Value::Text("v".into())]),
        )]);
        let census = StringCensus::from_value(&doc);
        assert_eq!(census.total_strings(), 3);
        assert_eq!(census.count_of("v"), 2);
    }

    #[test]
    fn test_verify_detects_mismatch() {
        let mut census = census_of(&["a", "b"]);
        census.corrupt_total_for_test(1);
        let err = census.verify().unwrap_err();
        assert!(matches!(
            err,
            AuditError::InvariantViolation {
                counted: 3,
                recorded: 2
            }
        ));
    }
}
