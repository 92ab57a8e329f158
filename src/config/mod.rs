//! Configuration system for eventctl
//!
//! A single YAML file supplies defaults for platform selection and
//! addressing, with environment overrides on top. Command-line flags win over
//! both.

pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{Config, OutputFormat};

use std::path::PathBuf;

/// Keys understood by `config get` and `config set`
pub const CONFIG_KEYS: &[&str] = &[
    "platform",
    "defaultNamespace",
    "region",
    "project",
    "cluster",
    "clusterLocation",
    "kubeconfig",
    "context",
    "output",
];

/// Get a configuration value by key
pub fn get_config_value(config: &schema::Config, key: &str) -> anyhow::Result<String> {
    let optional = |value: &Option<String>| value.clone().unwrap_or_default();
    match key {
        "platform" => Ok(config.platform.to_string()),
        "defaultNamespace" => Ok(config.default_namespace.clone()),
        "region" => Ok(optional(&config.region)),
        "project" => Ok(optional(&config.project)),
        "cluster" => Ok(optional(&config.cluster)),
        "clusterLocation" => Ok(optional(&config.cluster_location)),
        "kubeconfig" => Ok(config
            .kubeconfig
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()),
        "context" => Ok(optional(&config.context)),
        "output" => Ok(config.output.as_str().to_string()),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}

/// Set a configuration value by key. An empty value clears optional keys.
pub fn set_config_value(config: &mut schema::Config, key: &str, value: &str) -> anyhow::Result<()> {
    let optional = |value: &str| {
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    };
    match key {
        "platform" => {
            config.platform = value.parse()?;
        }
        "defaultNamespace" => {
            if value.is_empty() {
                return Err(anyhow::anyhow!("defaultNamespace cannot be empty"));
            }
            config.default_namespace = value.to_string();
        }
        "region" => config.region = optional(value),
        "project" => config.project = optional(value),
        "cluster" => config.cluster = optional(value),
        "clusterLocation" => config.cluster_location = optional(value),
        "kubeconfig" => config.kubeconfig = optional(value).map(PathBuf::from),
        "context" => config.context = optional(value),
        "output" => {
            config.output = value.parse()?;
        }
        _ => return Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }

    Ok(())
}
