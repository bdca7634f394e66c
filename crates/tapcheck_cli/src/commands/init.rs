use anyhow::{Context, Result};
use std::path::Path;
use tapcheck_core::RunConfig;
use tapcheck_parser::{DocumentFormat, detect_format, render};
use tracing::info;

use crate::output;

pub async fn execute(output_path: Option<&Path>) -> Result<()> {
    let format = match output_path {
        Some(path) => detect_format(path)
            .with_context(|| format!("Cannot pick a format for {}", path.display()))?,
        None => DocumentFormat::Yaml,
    };

    let config = RunConfig::default();
    let document = render(&config, format).context("Failed to serialize configuration")?;

    if let Some(path) = output_path {
        info!("Writing starter configuration to {}", path.display());
        std::fs::write(path, document)
            .with_context(|| format!("Failed to write to file: {}", path.display()))?;
        output::print_success(&format!("Configuration written to: {}", path.display()));
    } else {
        println!("{}", document);
    }

    Ok(())
}
