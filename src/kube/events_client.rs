//! Kubernetes-backed events client
//!
//! Triggers and sources are read as `DynamicObject`s: source kinds are only
//! known once their CRDs are discovered, so there are no generated types to
//! fetch them with.

use anyhow::{Context, Result};
use async_trait::async_trait;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::Api;
use kube::api::ListParams;
use kube::core::{ApiResource, DynamicObject, GroupVersionKind};

use crate::events::{Connector, EventsClient};
use crate::models::{
    SOURCE_CRD_LABEL, Source, SourceCrd, SourceReference, TRIGGER_GROUP, TRIGGER_KIND,
    TRIGGER_PLURAL, TRIGGER_VERSION, Trigger, TriggerReference,
};
use crate::platform::ConnectionContext;

/// Events client over a live cluster connection
pub struct KubeEventsClient {
    client: kube::Client,
}

impl KubeEventsClient {
    pub fn new(client: kube::Client) -> Self {
        Self { client }
    }

    fn trigger_resource() -> ApiResource {
        let gvk = GroupVersionKind::gvk(TRIGGER_GROUP, TRIGGER_VERSION, TRIGGER_KIND);
        ApiResource::from_gvk_with_plural(&gvk, TRIGGER_PLURAL)
    }
}

#[async_trait]
impl EventsClient for KubeEventsClient {
    async fn get_trigger(&self, trigger_ref: &TriggerReference) -> Result<Option<Trigger>> {
        let resource = Self::trigger_resource();
        let api: Api<DynamicObject> =
            Api::namespaced_with(self.client.clone(), &trigger_ref.namespace, &resource);

        tracing::debug!("Fetching trigger {}", trigger_ref);
        let obj = api
            .get_opt(&trigger_ref.name)
            .await
            .with_context(|| format!("Failed to fetch trigger {}", trigger_ref))?;

        Ok(obj.map(Trigger::from_object))
    }

    async fn list_source_crds(&self) -> Result<Vec<SourceCrd>> {
        let api: Api<CustomResourceDefinition> = Api::all(self.client.clone());
        let params = ListParams::default().labels(SOURCE_CRD_LABEL);

        let crds = api
            .list(&params)
            .await
            .context("Failed to list source custom resource definitions")?;

        let sources = crds
            .items
            .iter()
            .filter_map(|crd| {
                let source_crd = SourceCrd::from_crd(crd);
                if source_crd.is_none() {
                    tracing::debug!(
                        "Skipping source CRD {} with no served version",
                        crd.metadata.name.as_deref().unwrap_or_default()
                    );
                }
                source_crd
            })
            .collect();

        Ok(sources)
    }

    async fn get_source(
        &self,
        source_ref: &SourceReference,
        crd: &SourceCrd,
    ) -> Result<Option<Source>> {
        let resource = crd.api_resource();
        let api: Api<DynamicObject> = if crd.namespaced {
            Api::namespaced_with(self.client.clone(), &source_ref.namespace, &resource)
        } else {
            Api::all_with(self.client.clone(), &resource)
        };

        tracing::debug!("Fetching source {}", source_ref);
        let obj = api
            .get_opt(&source_ref.name)
            .await
            .with_context(|| format!("Failed to fetch source {}", source_ref))?;

        Ok(obj.map(Source::from_object))
    }

    fn release(&self) {
        // kube::Client pools connections per clone; dropping this handle is the close
        tracing::debug!("Closing Kubernetes client");
    }
}

/// Opens [`KubeEventsClient`]s for cluster-backed contexts
#[derive(Debug, Default, Clone, Copy)]
pub struct KubeConnector;

#[async_trait]
impl Connector for KubeConnector {
    type Client = KubeEventsClient;

    async fn connect(&self, ctx: &ConnectionContext) -> Result<KubeEventsClient> {
        let client = super::create_client(ctx).await?;
        Ok(KubeEventsClient::new(client))
    }
}
