//! Analysis report and its renderers
//!
//! [`AnalysisReport`] carries every figure of one run in a fixed order. It
//! renders as plain text for people and as JSON for tooling; both renderings
//! are deterministic for a given input and schema.

use std::fmt::Write as _;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::collector::{CensusAverages, StringCensus};
use super::coverage::CoverageReport;
use super::error::Result;
use super::estimators::{EstimateDetail, SavingsEstimate};
use super::models::OutputFormat;
use super::schema::{CategoryCounts, ConstantTable, DuplicateDefinition};
use super::units::{format_size, percent};

/// Headline numbers of the text census
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CensusSummary {
    pub total_strings: usize,
    pub total_string_size: usize,
    pub distinct_count: usize,
    /// `None` when the document holds no text
    pub averages: Option<CensusAverages>,
}

impl CensusSummary {
    pub fn from_census(census: &StringCensus) -> Self {
        Self {
            total_strings: census.total_strings(),
            total_string_size: census.total_string_size(),
            distinct_count: census.distinct_count(),
            averages: census.averages(),
        }
    }
}

/// What was learned from the schema source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDiagnostics {
    pub path: PathBuf,
    pub entries: usize,
    pub counts: CategoryCounts,
    pub duplicates: Vec<DuplicateDefinition>,
    /// How duplicates were resolved
    pub resolution: String,
}

impl SchemaDiagnostics {
    pub fn from_table(path: PathBuf, table: &ConstantTable) -> Self {
        Self {
            path,
            entries: table.len(),
            counts: table.category_counts(),
            duplicates: table.duplicates().to_vec(),
            resolution: "last definition wins".to_string(),
        }
    }
}

/// Coverage section of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CoverageOutcome {
    Analyzed(CoverageReport),
    Skipped { reason: String },
}

/// Everything computed by one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Size of the encoded input in bytes
    pub document_size: usize,
    pub census: CensusSummary,
    pub schema: Option<SchemaDiagnostics>,
    pub coverage: CoverageOutcome,
    pub estimates: Vec<SavingsEstimate>,
}

impl AnalysisReport {
    /// Sum of all estimates
    pub fn total_savings(&self) -> usize {
        self.estimates.iter().map(|e| e.saved_bytes).sum()
    }

    /// Document size after applying every estimated saving
    pub fn projected_size(&self) -> usize {
        self.document_size.saturating_sub(self.total_savings())
    }

    /// Look up an estimate by estimator name
    pub fn estimate(&self, name: &str) -> Option<&SavingsEstimate> {
        self.estimates.iter().find(|e| e.name == name)
    }

    /// Render in the requested format
    pub fn render(&self, format: OutputFormat, precision: usize) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.render_text(precision)),
            OutputFormat::Json => self.render_json(),
        }
    }

    /// Pretty-printed JSON with the derived totals appended
    pub fn render_json(&self) -> Result<String> {
        let mut value = serde_json::to_value(self)?;
        if let Some(obj) = value.as_object_mut() {
            obj.insert("total_savings".into(), self.total_savings().into());
            obj.insert("projected_size".into(), self.projected_size().into());
        }
        let mut out = serde_json::to_string_pretty(&value)?;
        out.push('\n');
        Ok(out)
    }

    /// Plain-text report
    pub fn render_text(&self, precision: usize) -> String {
        let size = |bytes: usize| format_size(bytes as u128, precision);
        let mut out = String::new();

        // Writing to a String cannot fail
        let _ = writeln!(out, "Document size:        {}", size(self.document_size));

        let census = &self.census;
        match census.averages {
            None => {
                let _ = writeln!(out, "No text values found.");
            }
            Some(averages) => {
                let _ = writeln!(out, "Text values:          {}", census.total_strings);
                let _ = writeln!(
                    out,
                    "Text size:            {} ({:.1}% of document)",
                    size(census.total_string_size),
                    percent(census.total_string_size, self.document_size)
                );
                let _ = writeln!(out, "Distinct values:      {}", census.distinct_count);
                let _ = writeln!(
                    out,
                    "Average size:         {:.2} B per value",
                    averages.bytes_per_string
                );
                let _ = writeln!(
                    out,
                    "Average frequency:    {:.2} uses per distinct value",
                    averages.occurrences_per_value
                );
            }
        }

        let _ = writeln!(out);
        if let Some(schema) = &self.schema {
            let _ = writeln!(
                out,
                "Schema {}: {} const, {} label",
                schema.path.display(),
                schema.counts.consts,
                schema.counts.labels
            );
            for dup in &schema.duplicates {
                let _ = writeln!(
                    out,
                    "  duplicate {} (line {}): {} {} -> {} {} ({})",
                    dup.name,
                    dup.line,
                    dup.previous.category,
                    dup.previous.value,
                    dup.replacement.category,
                    dup.replacement.value,
                    schema.resolution
                );
            }
        }

        match &self.coverage {
            CoverageOutcome::Skipped { reason } => {
                let _ = writeln!(out, "Coverage: skipped ({reason})");
            }
            CoverageOutcome::Analyzed(coverage) => {
                let _ = writeln!(
                    out,
                    "Covered values:       {} of {} ({:.1}%)",
                    coverage.covered_count(),
                    coverage.covered_count() + coverage.uncovered_count(),
                    coverage.coverage_ratio() * 100.0
                );
                let _ = writeln!(out, "Uncovered values:     {}", coverage.uncovered_count());
                let _ = writeln!(out, "Covered occurrences:  {}", coverage.covered_occurrences);
                let _ = writeln!(out, "Covered size:         {}", size(coverage.covered_bytes));
                if !coverage.top.is_empty() {
                    let _ = writeln!(out, "Top covered values:");
                    for (rank, value) in coverage.top.iter().enumerate() {
                        let _ = writeln!(
                            out,
                            "  {:>2}. {:<32} {:>6} x {:>4} B = {}",
                            rank + 1,
                            value.stat.value,
                            value.stat.count,
                            value.stat.byte_len(),
                            size(value.total_bytes())
                        );
                    }
                }
            }
        }

        let _ = writeln!(out);
        for estimate in &self.estimates {
            match &estimate.detail {
                EstimateDetail::Sharing(sharing) => {
                    let _ = writeln!(out, "Singleton values:     {}", sharing.singletons);
                    let _ = writeln!(
                        out,
                        "Repeated values:      {} ({} occurrences)",
                        sharing.repeated, sharing.repeated_occurrences
                    );
                    let _ = writeln!(out, "Sharing savings:      {}", size(sharing.saved_bytes));
                }
                EstimateDetail::HexTail(hex) => {
                    let _ = writeln!(out, "Hex tails:            {} values", hex.values_with_tail());
                    for (len, count) in &hex.buckets {
                        let _ = writeln!(out, "  {:>4} hex digits: {}", len, count);
                    }
                    let _ = writeln!(out, "Hex tail savings:     {}", size(hex.saved_bytes));
                }
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Projected size:       {} ({:.1}% of document)",
            size(self.projected_size()),
            percent(self.projected_size(), self.document_size)
        );
        out
    }
}
