//! Configuration schema definitions
//!
//! Defines the structure of configuration files using serde for serialization.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::platform::Platform;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Platform commands target when `--platform` is not given
    #[serde(default)]
    pub platform: Platform,

    /// Namespace used when a trigger is not namespace-qualified
    #[serde(default = "default_namespace")]
    pub default_namespace: String,

    /// Region of the managed platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Project owning the GKE cluster
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    /// GKE cluster name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,

    /// GKE cluster zone or region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_location: Option<String>,

    /// Kubeconfig file for the kubernetes platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context for the kubernetes platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Default output format for describe
    #[serde(default)]
    pub output: OutputFormat,
}

/// Output format of the describe document
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Yaml => "yaml",
            OutputFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow::anyhow!("output must be 'yaml' or 'json'")),
        }
    }
}

fn default_namespace() -> String {
    "default".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            platform: Platform::default(),
            default_namespace: default_namespace(),
            region: None,
            project: None,
            cluster: None,
            cluster_location: None,
            kubeconfig: None,
            context: None,
            output: OutputFormat::default(),
        }
    }
}
