//! `triggers describe` command

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use eventctl::config::{Config, OutputFormat};
use eventctl::kube::{KubeConnector, kubeconfig_namespace};
use eventctl::{
    ConnectionContext, Platform, PlatformArgs, SerializedTriggerAndSource, TriggerReference,
    describe_trigger,
};

/// Platform selection flags shared by eventing commands
#[derive(Args, Debug, Clone, Default)]
pub struct PlatformFlags {
    /// Target platform
    #[arg(long, value_enum)]
    pub platform: Option<Platform>,

    /// Region of the managed platform
    #[arg(long, help_heading = "Managed platform")]
    pub region: Option<String>,

    /// Project of the GKE cluster
    #[arg(long, help_heading = "GKE platform")]
    pub project: Option<String>,

    /// Name of the GKE cluster
    #[arg(long, help_heading = "GKE platform")]
    pub cluster: Option<String>,

    /// Zone or region of the GKE cluster
    #[arg(long, help_heading = "GKE platform")]
    pub cluster_location: Option<String>,

    /// Kubeconfig file to use
    #[arg(long, help_heading = "Kubernetes platform")]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use
    #[arg(long, help_heading = "Kubernetes platform")]
    pub context: Option<String>,
}

impl From<PlatformFlags> for PlatformArgs {
    fn from(flags: PlatformFlags) -> Self {
        PlatformArgs {
            platform: flags.platform,
            region: flags.region,
            project: flags.project,
            cluster: flags.cluster,
            cluster_location: flags.cluster_location,
            kubeconfig: flags.kubeconfig,
            context: flags.context,
        }
    }
}

/// Get details about a given trigger
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:\n  To get details about a given trigger:\n\n      $ eventctl triggers describe TRIGGER")]
pub struct DescribeArgs {
    /// Name of the trigger to describe
    pub trigger: String,

    /// Namespace of the trigger
    #[arg(long, short = 'n')]
    pub namespace: Option<String>,

    /// Output format
    #[arg(long, short = 'o', value_enum)]
    pub output: Option<OutputFormat>,

    #[command(flatten)]
    pub platform: PlatformFlags,
}

/// Run `triggers describe`, printing the document to stdout
pub async fn run_describe(args: DescribeArgs, config: &Config) -> Result<()> {
    let output = args.output.unwrap_or(config.output);
    let platform_args = PlatformArgs::from(args.platform);
    let ctx = ConnectionContext::resolve(&platform_args, config)?;

    let namespace = args
        .namespace
        .or_else(|| kubeconfig_namespace(&ctx))
        .unwrap_or_else(|| config.default_namespace.clone());
    let trigger_ref = TriggerReference::new(args.trigger, namespace);

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::debug!("Interrupt received, cancelling");
                cancel.cancel();
            }
        })
    };

    let resolved = describe_trigger(&KubeConnector, &ctx, &trigger_ref, &cancel).await;
    ctrl_c.abort();
    let pair = resolved?;

    let document = SerializedTriggerAndSource::from_pair(&pair)?;
    let rendered = match output {
        OutputFormat::Yaml => document.to_yaml()?,
        OutputFormat::Json => document.to_json()? + "\n",
    };
    print!("{}", rendered);

    Ok(())
}

/// Extra guidance printed after a describe failure, if any applies
pub fn describe_failure_hint(err: &anyhow::Error) -> Option<&'static str> {
    match err.downcast_ref::<eventctl::EventsError>() {
        Some(eventctl::EventsError::UnsupportedPlatform { .. }) => {
            Some("Select a cluster-backed platform with --platform gke or --platform kubernetes.")
        }
        _ => None,
    }
}
