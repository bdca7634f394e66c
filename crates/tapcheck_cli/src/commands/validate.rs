use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use tapcheck_core::{
    RunConfig, Schema, SourceConfig, ValidationContext, ValidationMode, water_tap_schema,
};
use tapcheck_parser::{load_config, load_schema};
use tapcheck_report::{Report, ReportPaths, persist, summarize};
use tapcheck_source::RecordLoader;
use tapcheck_validator::{DataValidator, drop_missing_key};
use tracing::{error, info};

use crate::output;

/// Options of the `validate` command.
pub struct ValidateArgs {
    pub config: Option<PathBuf>,
    pub mode: Option<ValidationMode>,
    pub permissive: bool,
    pub date: Option<NaiveDate>,
    pub sources: Vec<String>,
    pub fail_on_errors: bool,
    pub format: String,
}

pub async fn execute(args: ValidateArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => {
            info!("No config file given, using built-in sources");
            RunConfig::default()
        }
    };

    let schema = active_schema(&config, args.permissive)?;
    let validator = DataValidator::new();
    validator
        .validate_definition(&schema)
        .context("Schema definition is invalid")?;

    let mode = args.mode.unwrap_or(config.mode);
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let sources = config
        .select_sources(&args.sources)
        .context("Invalid source selection")?;

    info!(
        "Validating {} source(s) with schema '{}' ({} mode, {})",
        sources.len(),
        schema.name,
        mode,
        if schema.strict { "strict" } else { "permissive" }
    );

    let paths = ReportPaths {
        summary_dir: config.summary_dir.clone(),
        output_dir: config.output_dir.clone(),
        label: config.label.clone(),
    };

    let mut reports = Vec::with_capacity(sources.len());
    let mut unwritten = Vec::new();
    for source in sources {
        let report = run_source(&validator, &config, &schema, source, mode, date)
            .await
            .with_environment(source.environment);

        match persist(&report, &paths) {
            Ok(files) => {
                if args.format != "json" {
                    output::print_info(&format!(
                        "{}: wrote {}",
                        source.name,
                        files.text_report.display()
                    ));
                }
            }
            Err(e) => {
                error!("{}: {}", source.name, e);
                unwritten.push(source.name.clone());
            }
        }
        reports.push(report);
    }

    output::print_run_summary(&reports, &args.format)?;

    if !unwritten.is_empty() {
        bail!("Failed to write reports for {}", unwritten.join(", "));
    }

    if args.fail_on_errors && reports.iter().any(|r| !r.passed()) {
        std::process::exit(1);
    }

    Ok(())
}

/// Returns the schema for this run with the strictness overrides applied.
fn active_schema(config: &RunConfig, permissive: bool) -> Result<Schema> {
    let mut schema = match &config.schema {
        Some(path) => load_schema(path)
            .with_context(|| format!("Failed to load schema file: {}", path.display()))?,
        None => water_tap_schema(),
    };

    if let Some(strict) = config.strict {
        schema = schema.with_strict(strict);
    }
    if permissive {
        schema = schema.with_strict(false);
    }

    Ok(schema)
}

/// Fetches, validates and summarizes one source.
///
/// An unreachable source gives a zero-row report instead of an error.
async fn run_source(
    validator: &DataValidator,
    config: &RunConfig,
    schema: &Schema,
    source: &SourceConfig,
    mode: ValidationMode,
    date: NaiveDate,
) -> Report {
    let dataset = match RecordLoader::new(source).fetch().await {
        Ok(dataset) => dataset,
        Err(e) => {
            error!("{}", e);
            return Report::unavailable(&source.name, date, e);
        }
    };

    let context = ValidationContext::new()
        .with_key_field(&config.key_field)
        .with_source(&source.name);
    let outcomes = validator.validate_with_data(schema, &dataset, &context, mode);
    let filtered = drop_missing_key(&dataset, &config.key_field);

    summarize(
        &source.name,
        date,
        dataset.len(),
        &filtered,
        outcomes,
        schema,
        &config.insights,
    )
}
