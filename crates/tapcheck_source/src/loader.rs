//! Fetching snapshots from configured sources.

use crate::{SourceError, payload_to_dataset};
use serde_json::Value as JsonValue;
use std::path::Path;
use std::time::Duration;
use tapcheck_core::{DataSet, SourceConfig, SourceLocation};
use tracing::{debug, info};

/// Timeout applied to Firebase requests when the source sets none.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Loads the full record snapshot of one source.
#[derive(Debug, Clone)]
pub struct RecordLoader<'a> {
    source: &'a SourceConfig,
}

impl<'a> RecordLoader<'a> {
    /// Creates a loader for `source`.
    pub fn new(source: &'a SourceConfig) -> Self {
        Self { source }
    }

    /// Fetches every record of the source.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::SourceUnavailable`] if the file cannot be read,
    /// the request fails or times out, or the payload is not a collection of
    /// records.
    pub async fn fetch(&self) -> Result<DataSet, SourceError> {
        info!(
            "Fetching {} ({}) from {}",
            self.source.name, self.source.environment, self.source.location
        );

        let payload = match &self.source.location {
            SourceLocation::File { path } => self.read_file(path).await?,
            SourceLocation::Firebase {
                database_url,
                reference,
                auth_token_env,
                timeout_secs,
            } => {
                self.get_reference(
                    database_url,
                    reference,
                    auth_token_env.as_deref(),
                    timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
                )
                .await?
            }
        };

        let dataset = payload_to_dataset(&self.source.name, payload)?;
        info!("Retrieved {} records from {}", dataset.len(), self.source.name);
        Ok(dataset)
    }

    async fn read_file(&self, path: &Path) -> Result<JsonValue, SourceError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            SourceError::unavailable(&self.source.name, format!("{}: {}", path.display(), e))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            SourceError::unavailable(
                &self.source.name,
                format!("invalid JSON in {}: {}", path.display(), e),
            )
        })
    }

    async fn get_reference(
        &self,
        database_url: &str,
        reference: &str,
        auth_token_env: Option<&str>,
        timeout_secs: u64,
    ) -> Result<JsonValue, SourceError> {
        let name = &self.source.name;
        let url = reference_url(database_url, reference);
        debug!("GET {} (timeout {}s)", url, timeout_secs);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SourceError::unavailable(name, e))?;

        let mut request = client.get(&url);
        if let Some(var) = auth_token_env {
            let token = std::env::var(var).map_err(|_| {
                SourceError::unavailable(name, format!("auth token variable {} is not set", var))
            })?;
            request = request.query(&[("auth", token)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SourceError::unavailable(name, e))?
            .error_for_status()
            .map_err(|e| SourceError::unavailable(name, e))?;

        response
            .json::<JsonValue>()
            .await
            .map_err(|e| SourceError::unavailable(name, format!("invalid JSON response: {}", e)))
    }
}

/// Builds the REST URL of a database reference.
fn reference_url(database_url: &str, reference: &str) -> String {
    format!(
        "{}/{}.json",
        database_url.trim_end_matches('/'),
        reference.trim_matches('/')
    )
}
