//! Savings estimator trait and registry
//!
//! An estimator looks at a finished [`StringCensus`] and predicts how many
//! bytes one compaction strategy would save. Estimates are advisory.

use serde::{Deserialize, Serialize};

use super::collector::StringCensus;
use super::hex_tail::{HexTailBreakdown, HexTailEstimator};
use super::models::AnalysisConfig;
use super::sharing::{SharingBreakdown, SharingEstimator};

/// Strategy-specific figures behind an estimate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimateDetail {
    Sharing(SharingBreakdown),
    HexTail(HexTailBreakdown),
}

/// Result of one estimator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsEstimate {
    /// Name of the estimator that produced this
    pub name: String,
    /// Estimated bytes saved
    pub saved_bytes: usize,
    /// One-line summary of what was counted
    pub explanation: String,
    pub detail: EstimateDetail,
}

impl SavingsEstimate {
    pub fn new(
        name: impl Into<String>,
        saved_bytes: usize,
        explanation: impl Into<String>,
        detail: EstimateDetail,
    ) -> Self {
        Self {
            name: name.into(),
            saved_bytes,
            explanation: explanation.into(),
            detail,
        }
    }
}

/// Trait for estimating savings from a text census
pub trait SavingsEstimator: Send + Sync {
    /// Unique name for this estimator
    fn name(&self) -> &str;

    /// Compute the estimate
    fn estimate(&self, census: &StringCensus) -> SavingsEstimate;
}

/// Ordered collection of estimators applied to a census
pub struct EstimatorRegistry {
    estimators: Vec<Box<dyn SavingsEstimator>>,
}

impl EstimatorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            estimators: Vec::new(),
        }
    }

    /// Registry with the sharing and hex-tail estimators, in that order
    pub fn with_defaults(config: &AnalysisConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(SharingEstimator::new(config.reference_overhead)));
        registry.register(Box::new(HexTailEstimator::new(
            config.reference_overhead,
            config.min_hex_tail,
        )));
        registry
    }

    pub fn register(&mut self, estimator: Box<dyn SavingsEstimator>) {
        self.estimators.push(estimator);
    }

    pub fn estimators(&self) -> &[Box<dyn SavingsEstimator>] {
        &self.estimators
    }

    /// Run every estimator in registration order
    pub fn estimate_all(&self, census: &StringCensus) -> Vec<SavingsEstimate> {
        self.estimators.iter().map(|e| e.estimate(census)).collect()
    }
}

impl Default for EstimatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_order() {
        let registry = EstimatorRegistry::with_defaults(&AnalysisConfig::default());
        let names: Vec<_> = registry.estimators().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["string_sharing", "hex_tails"]);
    }

    #[test]
    fn test_estimate_all_on_empty_census() {
        let registry = EstimatorRegistry::with_defaults(&AnalysisConfig::default());
        let estimates = registry.estimate_all(&StringCensus::new());
        assert_eq!(estimates.len(), 2);
        assert!(estimates.iter().all(|e| e.saved_bytes == 0));
    }

    #[test]
    fn test_estimate_carries_explanation() {
        let estimator = SharingEstimator::new(4);
        let mut census = StringCensus::new();
        census.record("repeated-value");
        census.record("repeated-value");
        let estimate = estimator.estimate(&census);

        assert_eq!(estimate.saved_bytes, 10);
        assert!(estimate.explanation.starts_with("1 repeated values, 2 occurrences"));
    }

    #[test]
    fn test_detail_serializes_with_kind_tag() {
        let detail = EstimateDetail::Sharing(SharingBreakdown::default());
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["kind"], "sharing");
    }
}
