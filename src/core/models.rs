//! Core configuration models for cbor_string_audit
//!
//! This module contains the knobs of an analysis run and the output format
//! selection. Configuration can be loaded from a JSON file; fields that are
//! absent take their defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::{AuditError, Result};
use super::units::{DEFAULT_PRECISION, MAX_PRECISION};

/// Conventional schema file name, resolved against the working directory
pub const DEFAULT_SCHEMA_FILE: &str = "cospdx.cddl";

/// Bytes charged for one shared-reference token
pub const DEFAULT_REFERENCE_OVERHEAD: usize = 4;

/// Shortest hex tail worth converting (40 hex digits = 20 raw bytes)
pub const DEFAULT_MIN_HEX_TAIL: usize = 40;

/// Number of covered values listed in the coverage ranking
pub const DEFAULT_TOP_N: usize = 15;

/// Containers (arrays, maps, tags) the decoder will nest before giving up
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Upper bound for `max_depth`; decoding and dropping a value recurse per level
pub const MAX_DEPTH_LIMIT: usize = 2048;

/// What to do when the schema source cannot be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingSchemaPolicy {
    /// Omit coverage analysis and report everything else
    #[default]
    Skip,
    /// Abort the run with a configuration error
    Fail,
}

/// Output format for the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text (default)
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
}

/// Configuration for one analysis run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Cost in bytes of a shared reference replacing a text value
    pub reference_overhead: usize,
    /// Minimum trailing hex run length, in characters
    pub min_hex_tail: usize,
    /// Entries shown in the covered-value ranking
    pub top_n: usize,
    /// Decimal places used for human-readable sizes
    pub size_precision: usize,
    /// Location of the constant/label schema source
    pub schema_path: PathBuf,
    /// Behavior when `schema_path` cannot be read
    pub missing_schema: MissingSchemaPolicy,
    /// Nesting limit applied while decoding the document
    pub max_depth: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            reference_overhead: DEFAULT_REFERENCE_OVERHEAD,
            min_hex_tail: DEFAULT_MIN_HEX_TAIL,
            top_n: DEFAULT_TOP_N,
            size_precision: DEFAULT_PRECISION,
            schema_path: PathBuf::from(DEFAULT_SCHEMA_FILE),
            missing_schema: MissingSchemaPolicy::Skip,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse configuration from JSON text and validate it
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that make the estimators meaningless
    pub fn validate(&self) -> Result<()> {
        if self.min_hex_tail < 2 {
            return Err(AuditError::invalid_config(format!(
                "min_hex_tail must be at least 2, got {}",
                self.min_hex_tail
            )));
        }
        if self.top_n == 0 {
            return Err(AuditError::invalid_config("top_n must be at least 1"));
        }
        if self.size_precision > MAX_PRECISION {
            return Err(AuditError::invalid_config(format!(
                "size_precision must be at most {}, got {}",
                MAX_PRECISION, self.size_precision
            )));
        }
        if self.max_depth == 0 || self.max_depth > MAX_DEPTH_LIMIT {
            return Err(AuditError::invalid_config(format!(
                "max_depth must be between 1 and {}, got {}",
                MAX_DEPTH_LIMIT, self.max_depth
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.reference_overhead, 4);
        assert_eq!(config.min_hex_tail, 40);
        assert_eq!(config.top_n, 15);
        assert_eq!(config.schema_path, PathBuf::from("cospdx.cddl"));
        assert_eq!(config.missing_schema, MissingSchemaPolicy::Skip);
        assert_eq!(config.max_depth, 256);
        assert_eq!(config.size_precision, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = AnalysisConfig::from_json(r#"{"top_n": 5, "missing_schema": "fail"}"#).unwrap();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.missing_schema, MissingSchemaPolicy::Fail);
        assert_eq!(config.reference_overhead, 4);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = AnalysisConfig::from_json(r#"{"top_n": 0}"#).unwrap_err();
        assert!(matches!(err, AuditError::InvalidConfig { .. }));

        let err = AnalysisConfig::from_json(r#"{"min_hex_tail": 1}"#).unwrap_err();
        assert!(err.to_string().contains("min_hex_tail"));
    }

    #[test]
    fn test_size_precision_bounds() {
        assert!(AnalysisConfig::from_json(r#"{"size_precision": 16}"#).is_ok());
        let err = AnalysisConfig::from_json(r#"{"size_precision": 17}"#).unwrap_err();
        assert!(err.to_string().contains("size_precision"));
        let err = AnalysisConfig::from_json(r#"{"size_precision": 18446744073709551615}"#).unwrap_err();
        assert!(matches!(err, AuditError::InvalidConfig { .. }));
    }

    #[test]
    fn test_max_depth_bounds() {
        assert!(AnalysisConfig::from_json(r#"{"max_depth": 1}"#).is_ok());
        assert!(AnalysisConfig::from_json(r#"{"max_depth": 2048}"#).is_ok());
        for bad in ["0", "2049"] {
            let err = AnalysisConfig::from_json(&format!(r#"{{"max_depth": {bad}}}"#)).unwrap_err();
            assert!(err.to_string().contains("max_depth"), "{err}");
        }
    }

    #[test]
    fn test_malformed_json() {
        let err = AnalysisConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, AuditError::Json(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"reference_overhead": 2, "schema_path": "other.cddl"}}"#).unwrap();
        let config = AnalysisConfig::from_file(file.path()).unwrap();
        assert_eq!(config.reference_overhead, 2);
        assert_eq!(config.schema_path, PathBuf::from("other.cddl"));
    }
}
