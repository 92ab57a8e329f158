//! Platform selection and connection context
//!
//! Resolves which of the three platform modes a command targets and the
//! addressing each mode needs. Only cluster-backed platforms run eventing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::schema::Config;
use crate::events::EventsError;

/// Target platform
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Fully managed, hosted platform
    #[default]
    Managed,
    /// Kubernetes Engine cluster, addressed by project/location/cluster
    Gke,
    /// Any cluster reachable through a kubeconfig
    Kubernetes,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Managed => "managed",
            Platform::Gke => "gke",
            Platform::Kubernetes => "kubernetes",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Platform::Managed, Platform::Gke, Platform::Kubernetes]
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::all()
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown platform '{}', expected one of: managed, gke, kubernetes",
                    s
                )
            })
    }
}

/// Resolved target of a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionContext {
    Managed {
        region: Option<String>,
    },
    Gke {
        project: String,
        location: String,
        cluster: String,
    },
    Kubernetes {
        kubeconfig: Option<PathBuf>,
        context: Option<String>,
    },
}

/// Platform selection as supplied on the command line, before merging with config
#[derive(Debug, Clone, Default)]
pub struct PlatformArgs {
    pub platform: Option<Platform>,
    pub region: Option<String>,
    pub project: Option<String>,
    pub cluster: Option<String>,
    pub cluster_location: Option<String>,
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
}

impl ConnectionContext {
    /// Merge command-line selection over configuration.
    ///
    /// Fails when `gke` is selected without a full cluster address.
    pub fn resolve(args: &PlatformArgs, config: &Config) -> anyhow::Result<Self> {
        let platform = args.platform.unwrap_or(config.platform);
        let pick = |flag: &Option<String>, configured: &Option<String>| {
            flag.clone().or_else(|| configured.clone())
        };

        let ctx = match platform {
            Platform::Managed => ConnectionContext::Managed {
                region: pick(&args.region, &config.region),
            },
            Platform::Gke => {
                let project = pick(&args.project, &config.project)
                    .ok_or_else(|| anyhow::anyhow!("--project is required for platform gke"))?;
                let location = pick(&args.cluster_location, &config.cluster_location)
                    .ok_or_else(|| {
                        anyhow::anyhow!("--cluster-location is required for platform gke")
                    })?;
                let cluster = pick(&args.cluster, &config.cluster)
                    .ok_or_else(|| anyhow::anyhow!("--cluster is required for platform gke"))?;
                ConnectionContext::Gke {
                    project,
                    location,
                    cluster,
                }
            }
            Platform::Kubernetes => ConnectionContext::Kubernetes {
                kubeconfig: args
                    .kubeconfig
                    .clone()
                    .or_else(|| config.kubeconfig.clone()),
                context: pick(&args.context, &config.context),
            },
        };

        tracing::debug!("Resolved connection context: {}", ctx);
        Ok(ctx)
    }

    pub fn platform(&self) -> Platform {
        match self {
            ConnectionContext::Managed { .. } => Platform::Managed,
            ConnectionContext::Gke { .. } => Platform::Gke,
            ConnectionContext::Kubernetes { .. } => Platform::Kubernetes,
        }
    }

    /// Whether the target supports the events feature set
    pub fn supports_events(&self) -> bool {
        !matches!(self, ConnectionContext::Managed { .. })
    }

    /// Gate run once before any connection is opened
    pub fn ensure_events_supported(&self) -> Result<(), EventsError> {
        if self.supports_events() {
            Ok(())
        } else {
            Err(EventsError::UnsupportedPlatform {
                platform: self.platform().to_string(),
            })
        }
    }

    /// Kubeconfig context name for this target, if it pins one.
    ///
    /// GKE clusters use the name written by `gcloud container clusters get-credentials`.
    pub fn kube_context(&self) -> Option<String> {
        match self {
            ConnectionContext::Managed { .. } => None,
            ConnectionContext::Gke {
                project,
                location,
                cluster,
            } => Some(format!("gke_{}_{}_{}", project, location, cluster)),
            ConnectionContext::Kubernetes { context, .. } => context.clone(),
        }
    }
}

impl fmt::Display for ConnectionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionContext::Managed { region } => match region {
                Some(region) => write!(f, "managed ({})", region),
                None => write!(f, "managed"),
            },
            ConnectionContext::Gke {
                project,
                location,
                cluster,
            } => write!(f, "gke ({}/{}/{})", project, location, cluster),
            ConnectionContext::Kubernetes {
                kubeconfig,
                context,
            } => {
                write!(f, "kubernetes")?;
                if let Some(path) = kubeconfig {
                    write!(f, " [{}]", path.display())?;
                }
                if let Some(context) = context {
                    write!(f, " ({})", context)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_from_str() {
        assert_eq!("managed".parse::<Platform>().unwrap(), Platform::Managed);
        assert_eq!("GKE".parse::<Platform>().unwrap(), Platform::Gke);
        assert_eq!(
            "kubernetes".parse::<Platform>().unwrap(),
            Platform::Kubernetes
        );
        assert!("cloudrun".parse::<Platform>().is_err());
    }

    #[test]
    fn test_events_gate() {
        let managed = ConnectionContext::Managed {
            region: Some("us-central1".to_string()),
        };
        assert!(!managed.supports_events());
        assert!(matches!(
            managed.ensure_events_supported(),
            Err(EventsError::UnsupportedPlatform { platform }) if platform == "managed"
        ));

        let kubernetes = ConnectionContext::Kubernetes {
            kubeconfig: None,
            context: None,
        };
        assert!(kubernetes.ensure_events_supported().is_ok());
    }

    #[test]
    fn test_resolve_prefers_flags_over_config() {
        let config = Config {
            platform: Platform::Kubernetes,
            context: Some("from-config".to_string()),
            ..Default::default()
        };
        let args = PlatformArgs {
            context: Some("from-flag".to_string()),
            ..Default::default()
        };

        let ctx = ConnectionContext::resolve(&args, &config).unwrap();
        assert_eq!(ctx.kube_context().as_deref(), Some("from-flag"));
    }

    #[test]
    fn test_resolve_gke_requires_cluster_address() {
        let args = PlatformArgs {
            platform: Some(Platform::Gke),
            project: Some("proj".to_string()),
            cluster_location: Some("us-central1-a".to_string()),
            ..Default::default()
        };
        let err = ConnectionContext::resolve(&args, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("--cluster"));

        let args = PlatformArgs {
            cluster: Some("events".to_string()),
            ..args
        };
        let ctx = ConnectionContext::resolve(&args, &Config::default()).unwrap();
        assert_eq!(
            ctx.kube_context().as_deref(),
            Some("gke_proj_us-central1-a_events")
        );
        assert!(ctx.supports_events());
    }
}
