//! externally supplied client settings

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

/// Settings read from the application's properties file.
///
/// Read-only to the builder; they decide which base configuration is used and
/// whether the discovery overlay is applied.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientProperties {
    /// when `false` the application never creates a grid client
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// optional `<hazelcast-client>` document used as the base configuration
    #[serde(default)]
    pub xml_config: Option<String>,
    /// return the base configuration untouched, without the discovery overlay
    #[serde(default)]
    pub skip_default_configuration: bool,
    /// logical cluster (group) to join
    pub cluster_name: String,
}

/// clients are created unless explicitly switched off
pub const fn default_enabled() -> bool {
    true
}

impl ClientProperties {
    /// properties for `cluster_name`, everything else defaulted
    pub fn new(cluster_name: impl Into<String>) -> Self {
        Self {
            enabled: default_enabled(),
            xml_config: None,
            skip_default_configuration: false,
            cluster_name: cluster_name.into(),
        }
    }

    /// read the properties file at `path`
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let props = Self::parse_str(
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to find client properties at {}", path.display()))?,
        )?;
        debug!(?props, path = %path.display(), "loaded client properties");
        Ok(props)
    }

    /// attempts to decode the properties first as JSON, then YAML, finally erroring if neither work
    pub fn parse_str<S: AsRef<str>>(input: S) -> Result<Self> {
        match Self::json(input.as_ref()) {
            Ok(r) => Ok(r),
            Err(_err) => Self::yaml(input.as_ref()),
        }
    }

    /// decode from JSON
    pub fn json(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("failed to decode client properties as json")
    }

    /// decode from YAML
    pub fn yaml(input: &str) -> Result<Self> {
        serde_yaml::from_str(input).context("failed to decode client properties as yaml")
    }
}
