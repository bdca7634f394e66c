use anyhow::{Context, Result};
use std::path::Path;
use tapcheck_core::water_tap_schema;
use tapcheck_parser::load_schema;
use tracing::info;

use crate::output;

pub async fn execute(schema_path: Option<&Path>, format: &str) -> Result<()> {
    let schema = match schema_path {
        Some(path) => {
            info!("Loading schema: {}", path.display());
            load_schema(path)
                .with_context(|| format!("Failed to load schema file: {}", path.display()))?
        }
        None => water_tap_schema(),
    };

    output::print_schema(&schema, format)
}
