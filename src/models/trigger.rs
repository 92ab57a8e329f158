//! Trigger model
//!
//! A Trigger names the source it consumes from through the
//! `knative.dev/dependency` annotation rather than a typed field, so the
//! dependency is parsed once when the object is wrapped.

use kube::core::DynamicObject;
use serde::Deserialize;
use std::fmt;

/// Annotation carrying the JSON `{kind, name, apiVersion}` stub of a Trigger's source
pub const DEPENDENCY_ANNOTATION: &str = "knative.dev/dependency";

/// API group of eventing Triggers
pub const TRIGGER_GROUP: &str = "eventing.knative.dev";

/// API version of eventing Triggers
pub const TRIGGER_VERSION: &str = "v1";

/// Kind of eventing Triggers
pub const TRIGGER_KIND: &str = "Trigger";

/// Plural resource name of eventing Triggers
pub const TRIGGER_PLURAL: &str = "triggers";

/// Lookup key for a Trigger
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TriggerReference {
    pub name: String,
    pub namespace: String,
}

impl TriggerReference {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// Name used in user-facing messages
    pub fn display_name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for TriggerReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Abstract reference from a Trigger to the source it depends on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceStub {
    pub kind: String,
    pub name: String,
    pub namespace: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DependencyAnnotation {
    kind: String,
    name: String,
    #[serde(default)]
    namespace: Option<String>,
}

/// A fetched Trigger
#[derive(Debug, Clone)]
pub struct Trigger {
    object: DynamicObject,
    dependency: Option<SourceStub>,
}

impl Trigger {
    /// Wrap a dynamic object returned by the API server.
    ///
    /// A malformed dependency annotation is treated as no dependency; the
    /// Trigger itself is still describable.
    pub fn from_object(object: DynamicObject) -> Self {
        let namespace = object.metadata.namespace.clone().unwrap_or_default();
        let dependency = object
            .metadata
            .annotations
            .as_ref()
            .and_then(|annotations| annotations.get(DEPENDENCY_ANNOTATION))
            .and_then(|raw| match serde_json::from_str::<DependencyAnnotation>(raw) {
                Ok(dep) => Some(dep),
                Err(e) => {
                    tracing::debug!(
                        "Ignoring malformed {} annotation on {}/{}: {}",
                        DEPENDENCY_ANNOTATION,
                        namespace,
                        object.metadata.name.as_deref().unwrap_or_default(),
                        e
                    );
                    None
                }
            })
            .map(|dep| SourceStub {
                kind: dep.kind,
                name: dep.name,
                namespace: dep.namespace.unwrap_or_else(|| namespace.clone()),
            });

        Self { object, dependency }
    }

    /// Build a Trigger from a JSON document, as returned by `kubectl get -o json`
    pub fn from_json(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value::<DynamicObject>(value).map(Self::from_object)
    }

    pub fn name(&self) -> &str {
        self.object.metadata.name.as_deref().unwrap_or_default()
    }

    pub fn namespace(&self) -> &str {
        self.object.metadata.namespace.as_deref().unwrap_or_default()
    }

    /// The source this Trigger consumes from, if it declares one
    pub fn dependency(&self) -> Option<&SourceStub> {
        self.dependency.as_ref()
    }

    /// Full object as a transport-neutral value
    pub fn to_serializable(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(&self.object)
    }
}
