//! Kubernetes client module
//!
//! Builds a configured client for a cluster-backed [`ConnectionContext`] and
//! provides the [`EventsClient`](crate::events::EventsClient) implementation
//! that talks to it.
//!
//! HTTP/HTTPS proxies are honoured through the standard `HTTP_PROXY`,
//! `HTTPS_PROXY` and `NO_PROXY` environment variables.

mod events_client;

pub use events_client::{KubeConnector, KubeEventsClient};

use anyhow::{Context, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::path::Path;

use crate::platform::ConnectionContext;

/// Initialize and return a Kubernetes client for a connection context
///
/// - `kubernetes` with an explicit kubeconfig path reads that file
/// - `kubernetes` without a path and without a context uses the default
///   loading strategy (in-cluster config, `KUBECONFIG`, `~/.kube/config`)
/// - any pinned context (including the derived GKE context) is selected from
///   the default kubeconfig
pub async fn create_client(ctx: &ConnectionContext) -> Result<Client> {
    match ctx {
        ConnectionContext::Managed { .. } => Err(anyhow::anyhow!(
            "The managed platform has no Kubernetes API to connect to"
        )),
        ConnectionContext::Kubernetes {
            kubeconfig: Some(path),
            context,
        } => create_client_from_kubeconfig_path(path, context.as_deref()).await,
        ConnectionContext::Kubernetes {
            kubeconfig: None,
            context: None,
        } => create_default_client().await,
        _ => {
            let context = ctx.kube_context();
            create_client_for_context(context.as_deref()).await
        }
    }
}

/// Client from the default loading strategy
pub async fn create_default_client() -> Result<Client> {
    let config = Config::infer()
        .await
        .context("Failed to infer Kubernetes configuration")?;
    log_cluster(&config);
    Client::try_from(config).context("Failed to create Kubernetes client")
}

/// Client for a named context in the default kubeconfig
pub async fn create_client_for_context(context: Option<&str>) -> Result<Client> {
    let options = KubeConfigOptions {
        context: context.map(str::to_string),
        ..Default::default()
    };
    let config = Config::from_kubeconfig(&options)
        .await
        .with_context(|| match context {
            Some(name) => format!("Failed to load kubeconfig context '{}'", name),
            None => "Failed to load kubeconfig".to_string(),
        })?;
    log_cluster(&config);
    Client::try_from(config).context("Failed to create Kubernetes client")
}

/// Client from a specific kubeconfig file
pub async fn create_client_from_kubeconfig_path(
    path: &Path,
    context: Option<&str>,
) -> Result<Client> {
    let kubeconfig = Kubeconfig::read_from(path)
        .with_context(|| format!("Failed to read kubeconfig: {}", path.display()))?;
    let options = KubeConfigOptions {
        context: context.map(str::to_string),
        ..Default::default()
    };
    let config = Config::from_custom_kubeconfig(kubeconfig, &options)
        .await
        .with_context(|| format!("Failed to load kubeconfig: {}", path.display()))?;
    log_cluster(&config);
    Client::try_from(config).context("Failed to create Kubernetes client")
}

fn log_cluster(config: &Config) {
    tracing::debug!(
        "Using cluster {} (default namespace {})",
        config.cluster_url,
        config.default_namespace
    );
}

/// Namespace of the current kubeconfig context, if one is set
pub fn kubeconfig_namespace(ctx: &ConnectionContext) -> Option<String> {
    let kubeconfig = match ctx {
        ConnectionContext::Kubernetes {
            kubeconfig: Some(path),
            ..
        } => Kubeconfig::read_from(path).ok()?,
        ConnectionContext::Managed { .. } => return None,
        _ => Kubeconfig::read().ok()?,
    };
    let context_name = ctx
        .kube_context()
        .or_else(|| kubeconfig.current_context.clone())?;

    kubeconfig
        .contexts
        .iter()
        .find(|named| named.name == context_name)
        .and_then(|named| named.context.as_ref())
        .and_then(|context| context.namespace.clone())
}
