//! Core module for cbor_string_audit
//!
//! Data flows one way through these modules: a decoded document is walked
//! by the visitor, counted by the collector, and the resulting census feeds
//! the coverage analysis and the savings estimators.
//!
//! # Architecture
//!
//! - `error`: Error types using thiserror
//! - `models`: Run configuration and output format
//! - `visitor`: Depth-first text leaf traversal
//! - `collector`: Per-value occurrence census
//! - `schema`: Constant/label table loader
//! - `coverage`: Census vs. table join and ranking
//! - `estimators`: Estimator trait and registry
//! - `sharing`, `hex_tail`: The two savings estimators
//! - `engine`: Runs the whole pipeline
//! - `report`: Text and JSON rendering
//! - `units`: Human-readable sizes

pub mod error;
pub mod models;
pub mod visitor;
pub mod collector;
pub mod schema;
pub mod coverage;
pub mod estimators;
pub mod sharing;
pub mod hex_tail;
pub mod engine;
pub mod report;
pub mod units;

// Re-export commonly used types
pub use error::{AuditError, ErrorKind, Result, ResultExt};
pub use models::{AnalysisConfig, MissingSchemaPolicy, OutputFormat, DEFAULT_SCHEMA_FILE};
pub use visitor::{visit_text, TextLeaves};
pub use collector::{CensusAverages, StringCensus, StringStat};
pub use schema::{Category, CategoryCounts, ConstantEntry, ConstantTable, DuplicateDefinition};
pub use coverage::{analyze_coverage, CoverageReport, CoveredValue};
pub use estimators::{EstimateDetail, EstimatorRegistry, SavingsEstimate, SavingsEstimator};
pub use sharing::{SharingBreakdown, SharingEstimator};
pub use hex_tail::{HexTailBreakdown, HexTailEstimator};
pub use engine::{decode_document, read_input, AnalysisEngine};
pub use report::{AnalysisReport, CensusSummary, CoverageOutcome, SchemaDiagnostics};
pub use units::{format_size, human_size};
