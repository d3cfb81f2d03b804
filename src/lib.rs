//! cbor_string_audit - text redundancy census for CBOR documents
//!
//! This library measures how much of a CBOR document is spent on text
//! values and estimates what two compaction strategies would save:
//! interning repeated strings, and storing long trailing hex runs (content
//! hashes and the like) as raw byte strings. Text values can also be checked
//! against the `const.` / `label.` declarations of a schema file.
//!
//! # Architecture
//!
//! This crate follows the "Library-First" pattern:
//! - **lib.rs** / **core**: Pure analysis logic, no CLI concerns
//! - **bin/cbor-string-audit.rs**: Thin wrapper that calls the library
//!
//! # Example
//!
//! ```
//! use cbor_string_audit::{AnalysisConfig, AnalysisEngine};
//! use ciborium::Value;
//!
//! let doc = Value::Array(vec![Value::Text("YY".into()); 3]);
//! let mut bytes = Vec::new();
//! ciborium::into_writer(&doc, &mut bytes).unwrap();
//!
//! let engine = AnalysisEngine::new(AnalysisConfig::default());
//! let report = engine.analyze_bytes(&bytes).unwrap();
//! assert_eq!(report.census.total_strings, 3);
//! assert_eq!(report.census.distinct_count, 1);
//! ```

pub mod core;

pub use crate::core::{
    analyze_coverage, decode_document, format_size, human_size, read_input, AnalysisConfig,
    AnalysisEngine, AnalysisReport, AuditError, ConstantTable, CoverageOutcome, ErrorKind,
    MissingSchemaPolicy, OutputFormat, Result, StringCensus,
};

/// Library version, taken from Cargo metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Analyze `bytes` with `config`, loading the schema named in the config
///
/// This is the same pipeline the CLI runs.
pub fn analyze(bytes: &[u8], config: AnalysisConfig) -> Result<AnalysisReport> {
    AnalysisEngine::from_config(config)?.analyze_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_analyze_with_missing_schema_skips() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig {
            schema_path: dir.path().join("none.cddl"),
            ..AnalysisConfig::default()
        };
        // 0x63 "abc"
        let report = analyze(&[0x63, b'a', b'b', b'c'], config).unwrap();
        assert_eq!(report.census.total_string_size, 3);
        assert!(matches!(report.coverage, CoverageOutcome::Skipped { .. }));
    }
}
