//! CLI entry point for the Titanic manifest processing pipeline.

use anyhow::{Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use serde::Serialize;
use std::path::{Path, PathBuf};
use titanic_processing::{
    ChartRenderer, EncodingSummary, ImputationSummary, MissingValueReport, PipelineConfig,
    PipelineConfigBuilder, PipelineStage, ProcessingSummary, ProgressUpdate, RenderReport,
    TablePipeline, configured_exporters, export_all,
};
use tracing::{debug, error, info, warn};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Titanic passenger manifest preprocessing pipeline",
    long_about = "Loads the Titanic passenger manifest, fills missing values, derives and encodes \
                  features, draws summary charts and exports the processed table.\n\n\
                  EXAMPLES:\n  \
                  # Default locations (data/titanic.csv -> data/, visualizations/)\n  \
                  titanic-processing\n\n  \
                  # Custom input and output locations\n  \
                  titanic-processing -i manifest.csv --output-dir out --visualizations-dir out/charts\n\n  \
                  # Machine-readable summary, no charts\n  \
                  titanic-processing --skip-charts --json-summary | jq .summary"
)]
struct Args {
    /// Path to the manifest CSV file
    #[arg(short, long, default_value = "data/titanic.csv")]
    input: String,

    /// JSON configuration file
    ///
    /// Flags given on the command line override values from this file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for the SQLite and spreadsheet exports
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Directory for the chart files
    #[arg(long)]
    visualizations_dir: Option<PathBuf>,

    /// Table name inside the SQLite file (replaced on every run)
    #[arg(long)]
    table_name: Option<String>,

    /// Also write a CSV copy of the processed table under this file name
    #[arg(long)]
    csv: Option<String>,

    /// Do not draw the summary charts
    #[arg(long)]
    skip_charts: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Print a JSON summary to stdout instead of the console report
    ///
    /// Disables all logs and section output; useful for piping to other tools.
    #[arg(long)]
    json_summary: bool,
}

/// Everything the run produced, as printed by `--json-summary`.
#[derive(Debug, Serialize)]
struct RunReport {
    input: String,
    missing_values: MissingValueReport,
    imputation: ImputationSummary,
    encoding: EncodingSummary,
    processing_steps: Vec<String>,
    summary: ProcessingSummary,
    charts: Option<RenderReport>,
    exports: Vec<ExportRecord>,
}

#[derive(Debug, Serialize)]
struct ExportRecord {
    target: &'static str,
    path: Option<PathBuf>,
    error: Option<String>,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    // Load environment variables from .env file (RUST_LOG) before the filter reads them
    dotenv().ok();

    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json_summary);

    let config = build_config(&args)?;
    debug!("Configuration: {:?}", config);

    let mut builder = TablePipeline::builder().config(config);
    if !args.quiet {
        builder = builder.on_progress(|update| {
            debug!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }
    let pipeline = builder.build()?;

    run(pipeline, &args)
}

/// Load the JSON config when given, then apply command-line overrides.
fn build_config(args: &Args) -> Result<PipelineConfig> {
    let base = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            PipelineConfig::from_json_file(path)?
        }
        None => PipelineConfig::default(),
    };

    let mut builder = PipelineConfigBuilder::from_config(base);
    if let Some(dir) = &args.output_dir {
        builder = builder.output_dir(dir);
    }
    if let Some(dir) = &args.visualizations_dir {
        builder = builder.visualizations_dir(dir);
    }
    if let Some(name) = &args.table_name {
        builder = builder.table_name(name);
    }
    if let Some(name) = &args.csv {
        builder = builder.csv_file(name);
    }

    Ok(builder.build()?)
}

/// Console sections are skipped entirely in `--json-summary` mode.
fn section(args: &Args, title: &str) {
    if !args.json_summary {
        println!("\n=== {} ===", title);
    }
}

fn run(mut pipeline: TablePipeline, args: &Args) -> Result<()> {
    let console = !args.json_summary;

    section(args, "Loading Data");
    let table = pipeline.load(&args.input)?;
    if console {
        println!("First few rows of the dataset:");
        println!("{}", table.head(Some(5)));
    }

    section(args, "Missing Values Analysis");
    let missing_values = pipeline.analyze_missing_values()?;
    if console {
        print!("{}", missing_values);
    }

    section(args, "Processing Data");
    let imputation = pipeline.impute_missing_values()?;
    pipeline.engineer_features()?;
    let encoding = pipeline.encode_categorical_features()?;
    if console {
        print_processing(&imputation, &encoding);
    }

    let config = pipeline.config().clone();
    let table = pipeline.current()?;

    let charts = if args.skip_charts {
        info!("Chart rendering skipped");
        None
    } else {
        section(args, "Creating Visualizations");
        pipeline.report_progress(ProgressUpdate::new(
            PipelineStage::Rendering,
            0.0,
            "Drawing charts...",
        ));
        let report =
            ChartRenderer::from_config(&config).render_all(table, &config.visualizations_dir);
        pipeline.report_progress(ProgressUpdate::new(
            PipelineStage::Rendering,
            1.0,
            format!("{} charts drawn", report.rendered.len()),
        ));
        if console {
            print_charts(&report, &config.visualizations_dir);
        }
        Some(report)
    };

    section(args, "Exporting Processed Data");
    pipeline.report_progress(ProgressUpdate::new(
        PipelineStage::Export,
        0.0,
        "Writing exports...",
    ));
    let outcomes = export_all(table, &configured_exporters(&config));
    let exports: Vec<ExportRecord> = outcomes
        .into_iter()
        .map(|outcome| match outcome.result {
            Ok(path) => ExportRecord {
                target: outcome.target,
                path: Some(path),
                error: None,
            },
            Err(e) => ExportRecord {
                target: outcome.target,
                path: None,
                error: Some(e.to_string()),
            },
        })
        .collect();
    if console {
        print_exports(&exports);
    }

    let failed_exports = exports.iter().filter(|e| e.error.is_some()).count();
    if failed_exports == 0 {
        pipeline.report_progress(ProgressUpdate::complete("Processing complete"));
    } else {
        pipeline.report_progress(ProgressUpdate::failed(format!(
            "{} export(s) failed",
            failed_exports
        )));
    }

    let report = RunReport {
        input: args.input.clone(),
        missing_values,
        imputation,
        encoding,
        processing_steps: pipeline.processing_steps().to_vec(),
        summary: pipeline.summary()?,
        charts,
        exports,
    };

    if args.json_summary {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    if failed_exports > 0 {
        error!("{} export target(s) failed", failed_exports);
        return Err(anyhow!("{} export target(s) failed", failed_exports));
    }
    Ok(())
}

fn print_processing(imputation: &ImputationSummary, encoding: &EncodingSummary) {
    match imputation.age_median {
        Some(median) => println!(
            "Age: filled {} missing values with median {:.1}",
            imputation.age_filled, median
        ),
        None => println!("Age: no missing values"),
    }
    match &imputation.embarked_mode {
        Some(mode) => println!(
            "Embarked: filled {} missing values with '{}'",
            imputation.embarked_filled, mode
        ),
        None => println!("Embarked: no missing values"),
    }
    println!("HasCabin: {} passengers with a recorded cabin", imputation.cabins_present);

    for feature in &encoding.encoded {
        println!(
            "{} -> {}: {}",
            feature.feature,
            feature.encoded_column,
            feature
                .classes
                .iter()
                .enumerate()
                .map(|(code, class)| format!("{}={}", class, code))
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    for skipped in &encoding.skipped {
        warn!("Categorical feature '{}' not present, skipped", skipped);
    }
}

fn print_charts(report: &RenderReport, dir: &Path) {
    println!("Visualizations have been saved to: {}", dir.display());
    for failure in &report.failures {
        println!("  ! {}: {}", failure.chart.name(), failure.message);
        for cause in &failure.causes {
            println!("      caused by: {}", cause);
        }
    }
}

fn print_exports(exports: &[ExportRecord]) {
    println!("Processed data exported to:");
    for export in exports {
        match (&export.path, &export.error) {
            (Some(path), _) => println!("- {}: {}", export_label(export.target), path.display()),
            (None, Some(e)) => println!("- {}: FAILED ({})", export_label(export.target), e),
            (None, None) => {}
        }
    }
}

fn export_label(target: &str) -> &str {
    match target {
        "sqlite" => "SQLite",
        "xlsx" => "Excel",
        "csv" => "CSV",
        other => other,
    }
}

/// Print a human-readable summary of the run.
fn print_summary(report: &RunReport) {
    let summary = &report.summary;

    println!();
    println!("{}", "=".repeat(80));
    println!("PROCESSING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!("Input: {} ({} rows)", report.input, summary.rows);
    println!(
        "Columns: {} -> {} ({} added)",
        summary.columns_before,
        summary.columns_after,
        summary.added_columns.len()
    );
    println!(
        "Missing cells: {} -> {}",
        summary.missing_before, summary.missing_after
    );
    println!(
        "Completeness: {:.1}% -> {:.1}%",
        summary.completeness_before * 100.0,
        summary.completeness_after * 100.0
    );
    println!();

    if !report.processing_steps.is_empty() {
        println!("Actions Taken:");
        for step in &report.processing_steps {
            println!("  - {}", step);
        }
        println!();
    }

    if let Some(charts) = &report.charts
        && !charts.is_success()
    {
        println!(
            "Warnings:\n  ! {} of {} charts failed",
            charts.failures.len(),
            charts.failures.len() + charts.rendered.len()
        );
        println!();
    }

    println!("Use --json-summary for machine-readable output");
    println!("{}", "=".repeat(80));
}
