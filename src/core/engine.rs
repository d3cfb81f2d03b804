//! Analysis engine
//!
//! Orchestrates one run: decode the document, take the text census, verify
//! it, join it with the constant table and apply the savings estimators.
//! The engine owns all state of a run; nothing survives between runs.

use std::io::Read;
use std::path::Path;

use ciborium::Value;

use super::collector::StringCensus;
use super::coverage::analyze_coverage;
use super::error::{AuditError, Result, ResultExt};
use super::estimators::EstimatorRegistry;
use super::models::{AnalysisConfig, MissingSchemaPolicy};
use super::report::{AnalysisReport, CensusSummary, CoverageOutcome, SchemaDiagnostics};
use super::schema::ConstantTable;

/// Decode exactly one CBOR item from `bytes`
///
/// At most `max_depth` arrays, maps and tags may be nested; one more is
/// reported as [`AuditError::DepthLimitExceeded`].
pub fn decode_document(bytes: &[u8], max_depth: usize) -> Result<Value> {
    let mut reader = bytes;
    let value: Value = ciborium::de::from_reader_with_recursion_limit(&mut reader, max_depth)
        .map_err(|err| match err {
            ciborium::de::Error::RecursionLimitExceeded => {
                AuditError::DepthLimitExceeded { limit: max_depth }
            }
            other => AuditError::Decode(other),
        })?;
    if !reader.is_empty() {
        return Err(AuditError::TrailingBytes {
            offset: bytes.len() - reader.len(),
            remaining: reader.len(),
        });
    }
    Ok(value)
}

/// Read a whole document from `path`, or from stdin for `None` / `-`
pub fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(p) if p != Path::new("-") => {
            std::fs::read(p)
                .map_err(AuditError::from)
                .context(format!("reading {}", p.display()))
        }
        _ => {
            let mut buf = Vec::new();
            std::io::stdin()
                .lock()
                .read_to_end(&mut buf)
                .map_err(AuditError::from)
                .context("reading standard input")?;
            Ok(buf)
        }
    }
}

/// Main analysis engine
pub struct AnalysisEngine {
    config: AnalysisConfig,
    table: Option<ConstantTable>,
    skip_reason: Option<String>,
    estimators: EstimatorRegistry,
}

impl AnalysisEngine {
    /// Engine without a constant table; coverage will be reported as skipped
    pub fn new(config: AnalysisConfig) -> Self {
        let estimators = EstimatorRegistry::with_defaults(&config);
        Self {
            config,
            table: None,
            skip_reason: Some("no schema loaded".to_string()),
            estimators,
        }
    }

    /// Engine with an already parsed constant table
    pub fn with_table(config: AnalysisConfig, table: ConstantTable) -> Self {
        let mut engine = Self::new(config);
        engine.table = Some(table);
        engine.skip_reason = None;
        engine
    }

    /// Engine that loads the table from `config.schema_path`
    ///
    /// A missing schema is skipped or fatal depending on
    /// `config.missing_schema`. Other read errors are always fatal.
    pub fn from_config(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        match ConstantTable::load(&config.schema_path) {
            Ok(table) => Ok(Self::with_table(config, table)),
            Err(err @ AuditError::SchemaNotFound { .. }) => match config.missing_schema {
                MissingSchemaPolicy::Fail => Err(err),
                MissingSchemaPolicy::Skip => {
                    tracing::warn!(
                        path = %config.schema_path.display(),
                        "schema source not found, skipping coverage analysis"
                    );
                    let mut engine = Self::new(config);
                    engine.skip_reason = Some(err.to_string());
                    Ok(engine)
                }
            },
            Err(err) => Err(err.with_context("loading schema")),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn table(&self) -> Option<&ConstantTable> {
        self.table.as_ref()
    }

    /// Decode `bytes` and analyze the resulting document
    pub fn analyze_bytes(&self, bytes: &[u8]) -> Result<AnalysisReport> {
        let document = decode_document(bytes, self.config.max_depth)?;
        self.analyze_value(&document, bytes.len())
    }

    /// Analyze an already decoded document of `document_size` encoded bytes
    pub fn analyze_value(&self, document: &Value, document_size: usize) -> Result<AnalysisReport> {
        let census = StringCensus::from_value(document);
        census.verify()?;

        let coverage = match (&self.table, &self.skip_reason) {
            (Some(table), _) => CoverageOutcome::Analyzed(analyze_coverage(
                &census,
                table,
                self.config.top_n,
            )),
            (None, reason) => CoverageOutcome::Skipped {
                reason: reason.clone().unwrap_or_else(|| "no schema loaded".to_string()),
            },
        };

        let schema = self
            .table
            .as_ref()
            .map(|table| SchemaDiagnostics::from_table(self.config.schema_path.clone(), table));

        let estimates = self.estimators.estimate_all(&census);
        for estimate in &estimates {
            tracing::debug!(
                estimator = %estimate.name,
                saved_bytes = estimate.saved_bytes,
                "estimate complete"
            );
        }

        Ok(AnalysisReport {
            document_size,
            census: CensusSummary::from_census(&census),
            schema,
            coverage,
            estimates,
        })
    }
}
