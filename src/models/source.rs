//! Event source models
//!
//! Source kinds are not known statically: each one is a CRD labelled as a
//! duck-typed source, so everything needed to address an instance is read
//! off the CRD at discovery time.

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::core::{ApiResource, DynamicObject, GroupVersionKind};

/// Label selecting the CRDs that register an event source kind
pub const SOURCE_CRD_LABEL: &str = "duck.knative.dev/source=true";

/// One registered kind of event source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCrd {
    /// Correlation key, compared against a Trigger's dependency kind
    pub source_kind: String,
    pub group: String,
    pub version: String,
    pub plural: String,
    pub namespaced: bool,
}

impl SourceCrd {
    pub fn new(
        source_kind: impl Into<String>,
        group: impl Into<String>,
        version: impl Into<String>,
        plural: impl Into<String>,
    ) -> Self {
        Self {
            source_kind: source_kind.into(),
            group: group.into(),
            version: version.into(),
            plural: plural.into(),
            namespaced: true,
        }
    }

    /// Read the addressing of a source kind off its CRD.
    ///
    /// Picks the storage version, falling back to the first served one.
    /// Returns `None` when the CRD serves no version at all.
    pub fn from_crd(crd: &CustomResourceDefinition) -> Option<Self> {
        let spec = &crd.spec;
        let version = spec
            .versions
            .iter()
            .find(|v| v.storage && v.served)
            .or_else(|| spec.versions.iter().find(|v| v.served))?;

        Some(Self {
            source_kind: spec.names.kind.clone(),
            group: spec.group.clone(),
            version: version.name.clone(),
            plural: spec.names.plural.clone(),
            namespaced: spec.scope == "Namespaced",
        })
    }

    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }

    pub fn api_resource(&self) -> ApiResource {
        let gvk = GroupVersionKind::gvk(&self.group, &self.version, &self.source_kind);
        ApiResource::from_gvk_with_plural(&gvk, &self.plural)
    }
}

/// Concrete address of a source instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReference {
    pub name: String,
    pub namespace: String,
    pub kind: String,
    pub api_version: String,
    pub plural: String,
}

impl SourceReference {
    /// Combine a dependency's name and namespace with the CRD that registers its kind
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, crd: &SourceCrd) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            kind: crd.source_kind.clone(),
            api_version: crd.api_version(),
            plural: crd.plural.clone(),
        }
    }
}

impl std::fmt::Display for SourceReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}/{} in {}",
            self.plural, self.api_version, self.name, self.namespace
        )
    }
}

/// A fetched event source instance
#[derive(Debug, Clone)]
pub struct Source {
    object: DynamicObject,
}

impl Source {
    pub fn from_object(object: DynamicObject) -> Self {
        Self { object }
    }

    pub fn from_json(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value::<DynamicObject>(value).map(Self::from_object)
    }

    pub fn name(&self) -> &str {
        self.object.metadata.name.as_deref().unwrap_or_default()
    }

    /// The `spec` sub-field, or `null` when the object has none
    pub fn spec(&self) -> serde_json::Value {
        self.object
            .data
            .get("spec")
            .cloned()
            .unwrap_or(serde_json::Value::Null)
    }
}
