//! CLI configuration file.
//!
//! ```yaml
//! connection:
//!   endpoint: https://ows.rasdaman.org/rasdaman/ows
//!   accept_invalid_certs: true
//!   timeout_secs: 120
//! format: CSV
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;
use wcps_client::ConnectionConfig;
use wcps_common::OutputFormat;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub connection: ConnectionConfig,
    /// Output format used when `--format` is not given.
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

impl CliConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: CliConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }
}
