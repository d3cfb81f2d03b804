//! cbor-string-audit CLI - Command-line interface for the analysis engine
//!
//! This binary follows the "Thin Interface" pattern:
//! - Clap handles argument parsing and --help/--version
//! - Delegates to the library for all actual work
//! - Maps failure kinds onto distinct exit codes

// Exclude from coverage - CLI binary tested via integration tests
#![cfg_attr(tarpaulin, ignore)]

use std::io::Write;
use std::path::PathBuf;

use cbor_string_audit::core::{read_input, AnalysisEngine};
use cbor_string_audit::{AnalysisConfig, AuditError, MissingSchemaPolicy, OutputFormat};
use clap::{ArgAction, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Measure text redundancy in a CBOR document and estimate compaction savings.
#[derive(Parser, Debug)]
#[command(name = "cbor-string-audit")]
#[command(version = cbor_string_audit::VERSION)]
#[command(about = "Measure text redundancy in a CBOR document and estimate compaction savings.")]
#[command(after_help = "Examples:
  # Analyze a document against ./cospdx.cddl
  cbor-string-audit sbom.cbor

  # Read from stdin, use another schema, emit JSON
  cat sbom.cbor | cbor-string-audit --schema ../cospdx.cddl --format json

  # Fail instead of skipping coverage when the schema is missing
  cbor-string-audit sbom.cbor --require-schema
")]
struct Cli {
    /// CBOR document to analyze ("-" or absent for stdin)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Schema source with const./label. declarations [default: ./cospdx.cddl]
    #[arg(short = 's', long = "schema", value_name = "FILE")]
    schema: Option<PathBuf>,

    /// JSON config file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Abort when the schema source is missing instead of skipping coverage
    #[arg(long = "require-schema")]
    require_schema: bool,

    /// Bytes charged per shared reference
    #[arg(long = "reference-overhead", value_name = "BYTES")]
    reference_overhead: Option<usize>,

    /// Minimum trailing hex run, in characters
    #[arg(long = "min-hex-tail", value_name = "CHARS")]
    min_hex_tail: Option<usize>,

    /// Number of covered values to rank
    #[arg(long = "top", value_name = "N")]
    top: Option<usize>,

    /// Decimal places for human-readable sizes
    #[arg(long = "precision", value_name = "N")]
    precision: Option<usize>,

    /// Deepest container nesting accepted while decoding
    #[arg(long = "max-depth", value_name = "N")]
    max_depth: Option<usize>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    format: OutputFormatArg,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// More logging (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormatArg {
    Text,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Text => OutputFormat::Text,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_config(cli: &Cli) -> Result<AnalysisConfig, AuditError> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_file(path)
            .map_err(|e| e.with_context(format!("loading config {}", path.display())))?,
        None => AnalysisConfig::default(),
    };

    // CLI overrides
    if let Some(schema) = &cli.schema {
        config.schema_path = schema.clone();
    }
    if cli.require_schema {
        config.missing_schema = MissingSchemaPolicy::Fail;
    }
    if let Some(overhead) = cli.reference_overhead {
        config.reference_overhead = overhead;
    }
    if let Some(min) = cli.min_hex_tail {
        config.min_hex_tail = min;
    }
    if let Some(top) = cli.top {
        config.top_n = top;
    }
    if let Some(precision) = cli.precision {
        config.size_precision = precision;
    }
    if let Some(depth) = cli.max_depth {
        config.max_depth = depth;
    }
    config.validate()?;
    Ok(config)
}

fn run(cli: &Cli) -> Result<(), AuditError> {
    let config = build_config(cli)?;
    let precision = config.size_precision;
    tracing::debug!(?config, "configuration resolved");

    let engine = AnalysisEngine::from_config(config)?;
    let bytes = read_input(cli.input.as_deref())?;
    tracing::info!(bytes = bytes.len(), "document read");

    let report = engine.analyze_bytes(&bytes)?;
    let rendered = report.render(cli.format.into(), precision)?;

    match &cli.output {
        Some(path) => std::fs::write(path, rendered)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Err(err) = run(&cli) {
        let code = err.kind().exit_code();
        let err = anyhow::Error::new(err).context("analysis failed");
        eprintln!("Error: {err:#}");
        std::process::exit(code);
    }
}
