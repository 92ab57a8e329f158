//! Trigger to event-source correlation
//!
//! A Trigger only knows its source as `(kind, name, namespace)`. The kind is
//! matched against the source CRDs registered on the cluster right now, and
//! the matching CRD supplies the group, version and plural needed to fetch the
//! instance. Fetches run strictly in order: trigger, discovery, source.

use std::future::Future;
use tokio_util::sync::CancellationToken;

use super::client::EventsClient;
use super::error::{EventsError, EventsResult};
use crate::models::{Source, SourceCrd, SourceReference, Trigger, TriggerReference};

/// Outcome of looking up a Trigger's source
#[derive(Debug, Clone)]
pub enum SourceResolution {
    Found(Source),
    /// The Trigger carries no dependency annotation
    NoDependency,
    /// No registered CRD provides the dependency's kind
    NoMatchingCrd { kind: String },
    /// The kind is registered but the instance does not exist
    InstanceMissing(SourceReference),
}

impl SourceResolution {
    pub fn source(&self) -> Option<&Source> {
        match self {
            SourceResolution::Found(source) => Some(source),
            _ => None,
        }
    }
}

/// A Trigger and what became of its source
#[derive(Debug, Clone)]
pub struct ResolvedPair {
    pub trigger: Trigger,
    pub resolution: SourceResolution,
}

impl ResolvedPair {
    pub fn source(&self) -> Option<&Source> {
        self.resolution.source()
    }
}

/// Find the CRD registering `kind`.
///
/// Linear scan in discovery order; when several CRDs claim the same kind the
/// first one wins.
pub fn find_source_crd<'a>(crds: &'a [SourceCrd], kind: &str) -> Option<&'a SourceCrd> {
    crds.iter().find(|crd| crd.source_kind == kind)
}

/// Run one fetch, giving up early if the token is cancelled
async fn fetch<T>(
    cancel: &CancellationToken,
    call: impl Future<Output = anyhow::Result<T>>,
) -> EventsResult<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(EventsError::Cancelled),
        result = call => result.map_err(EventsError::Transport),
    }
}

/// Resolve a Trigger reference into the Trigger and its source.
///
/// Fails only when the Trigger is missing, a fetch fails or the token is
/// cancelled. A missing source is reported through [`SourceResolution`] and a
/// single warning.
pub async fn resolve<C>(
    client: &C,
    trigger_ref: &TriggerReference,
    cancel: &CancellationToken,
) -> EventsResult<ResolvedPair>
where
    C: EventsClient + ?Sized,
{
    let trigger = fetch(cancel, client.get_trigger(trigger_ref))
        .await?
        .ok_or_else(|| EventsError::TriggerNotFound {
            name: trigger_ref.display_name().to_string(),
        })?;
    tracing::debug!("Fetched trigger {}/{}", trigger.namespace(), trigger.name());

    let resolution = match trigger.dependency() {
        None => SourceResolution::NoDependency,
        Some(dependency) => {
            let crds = fetch(cancel, client.list_source_crds()).await?;
            tracing::debug!(
                "Discovered {} source CRDs while resolving {}",
                crds.len(),
                trigger_ref
            );

            match find_source_crd(&crds, &dependency.kind) {
                None => SourceResolution::NoMatchingCrd {
                    kind: dependency.kind.clone(),
                },
                Some(crd) => {
                    let source_ref =
                        SourceReference::new(&dependency.name, &dependency.namespace, crd);
                    match fetch(cancel, client.get_source(&source_ref, crd)).await? {
                        Some(source) => {
                            tracing::debug!(
                                "Resolved {} to source {}",
                                trigger_ref,
                                source.name()
                            );
                            SourceResolution::Found(source)
                        }
                        None => SourceResolution::InstanceMissing(source_ref),
                    }
                }
            }
        }
    };

    warn_unresolved(trigger_ref, &resolution);

    Ok(ResolvedPair {
        trigger,
        resolution,
    })
}

fn warn_unresolved(trigger_ref: &TriggerReference, resolution: &SourceResolution) {
    let name = trigger_ref.display_name();
    match resolution {
        SourceResolution::Found(_) => {}
        SourceResolution::NoDependency => {
            tracing::warn!(
                "No matching event source for trigger [{}]: it declares no dependency.",
                name
            );
        }
        SourceResolution::NoMatchingCrd { kind } => {
            tracing::warn!(
                "No matching event source for trigger [{}]: source kind [{}] is not registered on the cluster.",
                name,
                kind
            );
        }
        SourceResolution::InstanceMissing(source_ref) => {
            tracing::warn!(
                "No matching event source for trigger [{}]: {} [{}] not found in namespace [{}].",
                name,
                source_ref.kind,
                source_ref.name,
                source_ref.namespace
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::client::MockEventsClient;
    use mockall::predicate::always;
    use serde_json::json;

    fn trigger(dependency: Option<serde_json::Value>) -> Trigger {
        let mut metadata = json!({ "name": "t1", "namespace": "ns" });
        if let Some(dep) = dependency {
            metadata["annotations"] =
                json!({ (crate::models::DEPENDENCY_ANNOTATION): dep.to_string() });
        }
        Trigger::from_json(json!({
            "apiVersion": "eventing.knative.dev/v1",
            "kind": "Trigger",
            "metadata": metadata,
            "spec": { "broker": "default" }
        }))
        .unwrap()
    }

    fn gcs_trigger() -> Trigger {
        trigger(Some(
            json!({ "kind": "GcsSource", "name": "s1", "namespace": "ns" }),
        ))
    }

    fn source() -> Source {
        Source::from_json(json!({
            "apiVersion": "events.cloud.google.com/v1",
            "kind": "GcsSource",
            "metadata": { "name": "s1", "namespace": "ns" },
            "spec": { "bucket": "b" }
        }))
        .unwrap()
    }

    fn trigger_ref() -> TriggerReference {
        TriggerReference::new("t1", "ns")
    }

    #[test]
    fn test_find_source_crd_first_match_wins() {
        let crds = vec![
            SourceCrd::new("PubsubSource", "events.cloud.google.com", "v1", "pubsubsources"),
            SourceCrd::new("GcsSource", "events.cloud.google.com", "v1", "gcssources"),
            SourceCrd::new("GcsSource", "legacy.example.com", "v1alpha1", "gcssources"),
        ];
        let crd = find_source_crd(&crds, "GcsSource").unwrap();
        assert_eq!(crd.group, "events.cloud.google.com");
        assert!(find_source_crd(&crds, "gcssource").is_none());
        assert!(find_source_crd(&[], "GcsSource").is_none());
    }

    #[tokio::test]
    async fn test_trigger_not_found_skips_discovery() {
        let mut client = MockEventsClient::new();
        client.expect_get_trigger().times(1).returning(|_| Ok(None));
        client.expect_list_source_crds().never();
        client.expect_get_source().never();

        let err = resolve(&client, &trigger_ref(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, EventsError::TriggerNotFound { ref name } if name == "t1"));
    }

    #[tokio::test]
    async fn test_no_matching_crd() {
        let mut client = MockEventsClient::new();
        client
            .expect_get_trigger()
            .times(1)
            .returning(|_| Ok(Some(gcs_trigger())));
        client.expect_list_source_crds().times(1).returning(|| {
            Ok(vec![SourceCrd::new(
                "PubsubSource",
                "events.cloud.google.com",
                "v1",
                "pubsubsources",
            )])
        });
        client.expect_get_source().never();

        let pair = resolve(&client, &trigger_ref(), &CancellationToken::new())
            .await
            .unwrap();
        assert!(pair.source().is_none());
        assert!(
            matches!(pair.resolution, SourceResolution::NoMatchingCrd { ref kind } if kind == "GcsSource")
        );
    }

    #[tokio::test]
    async fn test_source_found_uses_dependency_name_and_namespace() {
        let mut client = MockEventsClient::new();
        client
            .expect_get_trigger()
            .returning(|_| Ok(Some(gcs_trigger())));
        client.expect_list_source_crds().times(1).returning(|| {
            Ok(vec![
                SourceCrd::new("GcsSource", "events.cloud.google.com", "v1", "gcssources"),
                SourceCrd::new(
                    "PubsubSource",
                    "events.cloud.google.com",
                    "v1",
                    "pubsubsources",
                ),
            ])
        });
        client
            .expect_get_source()
            .times(1)
            .withf(|source_ref, crd| {
                source_ref.name == "s1"
                    && source_ref.namespace == "ns"
                    && source_ref.kind == "GcsSource"
                    && crd.plural == "gcssources"
            })
            .returning(|_, _| Ok(Some(source())));

        let pair = resolve(&client, &trigger_ref(), &CancellationToken::new())
            .await
            .unwrap();
        assert!(matches!(pair.resolution, SourceResolution::Found(_)));
        assert_eq!(pair.source().unwrap().spec(), json!({ "bucket": "b" }));
    }

    #[tokio::test]
    async fn test_duplicate_kind_uses_first_crd() {
        let mut client = MockEventsClient::new();
        client
            .expect_get_trigger()
            .returning(|_| Ok(Some(gcs_trigger())));
        client.expect_list_source_crds().returning(|| {
            Ok(vec![
                SourceCrd::new("GcsSource", "first.example.com", "v1", "gcssources"),
                SourceCrd::new("GcsSource", "second.example.com", "v1", "gcssources"),
            ])
        });
        client
            .expect_get_source()
            .times(1)
            .withf(|source_ref, crd| {
                source_ref.api_version == "first.example.com/v1" && crd.group == "first.example.com"
            })
            .returning(|_, _| Ok(None));

        let pair = resolve(&client, &trigger_ref(), &CancellationToken::new())
            .await
            .unwrap();
        match pair.resolution {
            SourceResolution::InstanceMissing(source_ref) => {
                assert_eq!(source_ref.api_version, "first.example.com/v1");
                assert_eq!(source_ref.name, "s1");
            }
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_trigger_without_dependency() {
        let mut client = MockEventsClient::new();
        client
            .expect_get_trigger()
            .returning(|_| Ok(Some(trigger(None))));
        client.expect_list_source_crds().never();
        client.expect_get_source().never();

        let pair = resolve(&client, &trigger_ref(), &CancellationToken::new())
            .await
            .unwrap();
        assert!(matches!(pair.resolution, SourceResolution::NoDependency));
        assert_eq!(pair.trigger.name(), "t1");
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let mut client = MockEventsClient::new();
        client
            .expect_get_trigger()
            .returning(|_| Ok(Some(gcs_trigger())));
        client
            .expect_list_source_crds()
            .returning(|| Err(anyhow::anyhow!("connection reset")));
        client.expect_get_source().with(always(), always()).never();

        let err = resolve(&client, &trigger_ref(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, EventsError::Transport(_)));
        assert_eq!(err.to_string(), "connection reset");
    }

    #[tokio::test]
    async fn test_cancelled_before_fetch() {
        let mut client = MockEventsClient::new();
        client
            .expect_get_trigger()
            .returning(|_| Ok(Some(gcs_trigger())));
        client.expect_list_source_crds().never();

        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = resolve(&client, &trigger_ref(), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, EventsError::Cancelled));
    }
}
