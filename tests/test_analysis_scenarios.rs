//! End-to-end scenarios for the analysis engine
//!
//! These tests build CBOR documents in memory, run the whole pipeline and
//! check the reported figures:
//! - Census totals and the occurrence invariant
//! - Sharing and hex-tail estimates
//! - Coverage against a schema, including duplicate declarations
//! - Determinism across repeated runs

use cbor_string_audit::core::{
    AnalysisConfig, AnalysisEngine, AnalysisReport, ConstantTable, CoverageOutcome,
    EstimateDetail, StringCensus,
};
use ciborium::Value;
use proptest::prelude::*;
use std::fs;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

fn encode(value: &Value) -> Vec<u8> {
    let mut bytes = Vec::new();
    ciborium::into_writer(value, &mut bytes).unwrap();
    bytes
}

fn run(doc: &Value, schema: Option<&str>) -> AnalysisReport {
    let config = AnalysisConfig::default();
    let engine = match schema {
        Some(source) => AnalysisEngine::with_table(config, ConstantTable::parse(source)),
        None => AnalysisEngine::new(config),
    };
    engine.analyze_bytes(&encode(doc)).unwrap()
}

fn sharing_savings(report: &AnalysisReport) -> usize {
    report.estimate("string_sharing").unwrap().saved_bytes
}

fn hex_detail(report: &AnalysisReport) -> cbor_string_audit::core::HexTailBreakdown {
    match &report.estimate("hex_tails").unwrap().detail {
        EstimateDetail::HexTail(breakdown) => breakdown.clone(),
        other => panic!("unexpected detail {other:?}"),
    }
}

/// A small SPDX-like document mixing every value kind
fn sbom_like_document() -> Value {
    let checksum = "sha256-9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";
    let package = |name: &str| {
        Value::Map(vec![
            (text("type"), text("software_Package")),
            (text("name"), text(name)),
            (text("verifiedUsing"), Value::Array(vec![text(checksum)])),
            (text("size"), Value::Integer(1024.into())),
            (text("raw"), Value::Bytes(vec![1, 2, 3])),
            (text("created"), Value::Tag(0, Box::new(text("2024-01-01T00:00:00Z")))),
        ])
    };
    Value::Map(vec![
        (text("@context"), text("https://spdx.org/rdf/3.0.0/spdx-context.jsonld")),
        (
            text("@graph"),
            Value::Array(vec![package("alpha"), package("beta"), package("gamma")]),
        ),
        (text("valid"), Value::Bool(true)),
        (text("ratio"), Value::Float(0.5)),
        (text("comment"), Value::Null),
    ])
}

// =============================================================================
// Census Scenarios
// =============================================================================

#[test]
fn test_scenario_census_totals() {
    let doc = Value::Array(vec![text("X"), text("YY"), text("YY"), text("YY")]);
    let report = run(&doc, None);

    assert_eq!(report.census.total_strings, 4);
    assert_eq!(report.census.distinct_count, 2);
    assert_eq!(report.census.total_string_size, 7);
}

#[test]
fn test_scenario_short_repeats_save_nothing() {
    let doc = Value::Array(vec![text("X"), text("YY"), text("YY"), text("YY")]);
    let report = run(&doc, None);
    assert_eq!(sharing_savings(&report), 0);
}

#[test]
fn test_scenario_forty_two_digit_hash_twice() {
    let hash = "abcdef0123456789abcdef0123456789abcdef0123";
    assert_eq!(hash.len(), 42);
    let doc = Value::Array(vec![text(hash), text(hash)]);
    let report = run(&doc, None);

    let hex = hex_detail(&report);
    assert_eq!(hex.buckets.len(), 1);
    assert_eq!(hex.buckets.get(&42), Some(&1));
    assert_eq!(hex.saved_bytes, 19);
}

#[test]
fn test_document_without_text() {
    let doc = Value::Array(vec![
        Value::Integer(1.into()),
        Value::Bytes(vec![0xde, 0xad]),
        Value::Map(vec![(Value::Integer(2.into()), Value::Null)]),
    ]);
    let report = run(&doc, None);
    assert_eq!(report.census.total_strings, 0);
    assert!(report.census.averages.is_none());
    assert!(report.render_text(1).contains("No text values found."));
    assert_eq!(report.total_savings(), 0);
}

#[test]
fn test_sbom_like_document() {
    let report = run(&sbom_like_document(), None);

    // 5 top-level keys + @context value + 3 packages x (6 keys + type + name + checksum + tagged date)
    assert_eq!(report.census.total_strings, 5 + 1 + 3 * 10);
    let hex = hex_detail(&report);
    assert_eq!(hex.buckets.get(&64), Some(&1));
    assert!(sharing_savings(&report) > 0);
}

// =============================================================================
// Coverage Scenarios
// =============================================================================

#[test]
fn test_scenario_coverage_partition() {
    let doc = Value::Array(vec![text("FOO"), text("BAZ")]);
    let report = run(&doc, Some("const.FOO = 1\nlabel.BAR = 2\n"));

    let coverage = match report.coverage {
        CoverageOutcome::Analyzed(coverage) => coverage,
        other => panic!("unexpected coverage {other:?}"),
    };
    let covered: Vec<_> = coverage.covered.iter().map(|c| c.stat.value.as_str()).collect();
    let uncovered: Vec<_> = coverage.uncovered.iter().map(|s| s.value.as_str()).collect();
    assert_eq!(covered, vec!["FOO"]);
    assert_eq!(uncovered, vec!["BAZ"]);
}

#[test]
fn test_scenario_duplicate_declaration_does_not_abort() {
    let doc = Value::Array(vec![text("FOO")]);
    let report = run(&doc, Some("const.FOO = 1\nconst.FOO = 2\n"));

    let schema = report.schema.as_ref().unwrap();
    assert_eq!(schema.duplicates.len(), 1);
    assert_eq!(schema.duplicates[0].previous.value, "1");
    assert_eq!(schema.duplicates[0].replacement.value, "2");
    assert!(report.render_text(1).contains("duplicate FOO"));

    match report.coverage {
        CoverageOutcome::Analyzed(coverage) => {
            assert_eq!(coverage.covered[0].declared_value, "2");
        }
        other => panic!("unexpected coverage {other:?}"),
    }
}

#[test]
fn test_coverage_ranking_in_report() {
    let mut items = vec![text("software_Package"); 4];
    items.extend(vec![text("name"); 10]);
    items.push(text("unlisted"));
    let report = run(
        &Value::Array(items),
        Some("const.software_Package = 1\nlabel.name = 2\n"),
    );
    match report.coverage {
        CoverageOutcome::Analyzed(coverage) => {
            // 16 x 4 = 64 beats 4 x 10 = 40
            assert_eq!(coverage.top[0].stat.value, "software_Package");
            assert_eq!(coverage.top[1].stat.value, "name");
            assert_eq!(coverage.covered_bytes, 104);
            assert_eq!(coverage.covered_occurrences, 14);
        }
        other => panic!("unexpected coverage {other:?}"),
    }
}

#[test]
fn test_schema_loaded_from_working_file() {
    let dir = TempDir::new().unwrap();
    let schema_path = dir.path().join("cospdx.cddl");
    fs::write(&schema_path, "label.name = 1\nconst.Tool = 7\n").unwrap();

    let config = AnalysisConfig {
        schema_path,
        ..AnalysisConfig::default()
    };
    let doc = Value::Map(vec![(text("name"), text("Tool"))]);
    let report = cbor_string_audit::analyze(&encode(&doc), config).unwrap();
    match report.coverage {
        CoverageOutcome::Analyzed(coverage) => assert_eq!(coverage.covered_count(), 2),
        other => panic!("unexpected coverage {other:?}"),
    }
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_repeated_runs_are_identical() {
    let doc = sbom_like_document();
    let schema = "const.software_Package = 1\nlabel.type = 2\n";
    let first = run(&doc, Some(schema));
    let second = run(&doc, Some(schema));
    assert_eq!(first, second);
    assert_eq!(first.render_text(1), second.render_text(1));
    assert_eq!(first.render_json().unwrap(), second.render_json().unwrap());
}

// =============================================================================
// Occurrence Invariant
// =============================================================================

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|i| Value::Integer(i.into())),
        prop::collection::vec(any::<u8>(), 0..8).prop_map(Value::Bytes),
        "[a-f0-9]{0,48}".prop_map(Value::Text),
        prop::sample::select(vec!["a", "bb", "ccc", "a"]).prop_map(|s| Value::Text(s.to_string())),
    ];
    leaf.prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
            prop::collection::vec((inner.clone(), inner.clone()), 0..4).prop_map(Value::Map),
            inner.prop_map(|v| Value::Tag(24, Box::new(v))),
        ]
    })
}

fn count_text(value: &Value) -> usize {
    match value {
        Value::Text(_) => 1,
        Value::Array(items) => items.iter().map(count_text).sum(),
        Value::Map(entries) => entries.iter().map(|(k, v)| count_text(k) + count_text(v)).sum(),
        Value::Tag(_, inner) => count_text(inner),
        _ => 0,
    }
}

proptest! {
    #[test]
    fn prop_counts_sum_to_total(doc in arb_value()) {
        let census = StringCensus::from_value(&doc);
        let recorded: usize = census.stats().map(|s| s.count).sum();
        prop_assert_eq!(recorded, census.total_strings());
        prop_assert_eq!(census.total_strings(), count_text(&doc));
        prop_assert!(census.verify().is_ok());
    }

    #[test]
    fn prop_analysis_is_deterministic(doc in arb_value()) {
        let bytes = encode(&doc);
        let engine = AnalysisEngine::new(AnalysisConfig::default());
        let first = engine.analyze_bytes(&bytes).unwrap();
        let second = engine.analyze_bytes(&bytes).unwrap();
        prop_assert_eq!(first, second);
    }
}
