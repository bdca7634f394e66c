mod commands;
mod output;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tapcheck_core::ValidationMode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tapcheck")]
#[command(version, about = "Water tap database validator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every configured source and write reports
    Validate {
        /// Path to the run configuration (YAML or TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Validation mode: batch, row, both
        #[arg(short, long, value_parser = parse_mode)]
        mode: Option<ValidationMode>,

        /// Treat unknown keys as warnings instead of errors
        #[arg(long)]
        permissive: bool,

        /// Run date used in report names (YYYY-MM-DD, defaults to today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,

        /// Only validate the named source (repeatable)
        #[arg(short, long = "source")]
        sources: Vec<String>,

        /// Exit with a failure status if any source has errors
        #[arg(long)]
        fail_on_errors: bool,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Print the active schema
    Schema {
        /// Schema file (YAML or TOML); the built-in water tap schema otherwise
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Write a starter run configuration
    Init {
        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn parse_mode(value: &str) -> Result<ValidationMode, String> {
    match value.to_lowercase().as_str() {
        "batch" => Ok(ValidationMode::Batch),
        "row" => Ok(ValidationMode::Row),
        "both" => Ok(ValidationMode::Both),
        other => Err(format!(
            "unknown mode '{}', expected one of: batch, row, both",
            other
        )),
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}': {}", value, e))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    match cli.command {
        Commands::Validate {
            config,
            mode,
            permissive,
            date,
            sources,
            fail_on_errors,
            format,
        } => {
            commands::validate::execute(commands::validate::ValidateArgs {
                config,
                mode,
                permissive,
                date,
                sources,
                fail_on_errors,
                format,
            })
            .await
        }

        Commands::Schema { schema, format } => {
            commands::schema::execute(schema.as_deref(), &format).await
        }

        Commands::Init { output } => commands::init::execute(output.as_deref()).await,
    }
}
