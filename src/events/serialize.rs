//! Display projection of a resolved trigger
//!
//! The trigger is emitted whole; the source is cut down to its `spec`. An
//! unresolved source becomes an explicit `null` so the document always has
//! both halves.

use anyhow::{Context, Result};
use serde::Serialize;

use super::correlator::ResolvedPair;

/// Two-part describe document, serialized in field order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SerializedTriggerAndSource {
    pub serialized_trigger: serde_json::Value,
    pub serialized_source: serde_json::Value,
}

impl SerializedTriggerAndSource {
    pub fn from_pair(pair: &ResolvedPair) -> Result<Self> {
        let serialized_trigger = pair
            .trigger
            .to_serializable()
            .context("Failed to serialize trigger")?;
        let serialized_source = pair
            .source()
            .map(|source| source.spec())
            .unwrap_or(serde_json::Value::Null);

        Ok(Self {
            serialized_trigger,
            serialized_source,
        })
    }

    /// Trigger YAML, a blank separator line, then the source spec YAML
    pub fn to_yaml(&self) -> Result<String> {
        let trigger = serde_yaml::to_string(&self.serialized_trigger)
            .context("Failed to render trigger as YAML")?;
        let source = serde_yaml::to_string(&self.serialized_source)
            .context("Failed to render source as YAML")?;
        Ok(format!("{}\n{}", trigger, source))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to render describe output as JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::SourceResolution;
    use crate::models::{Source, Trigger};
    use serde_json::json;

    fn trigger() -> Trigger {
        Trigger::from_json(json!({
            "apiVersion": "eventing.knative.dev/v1",
            "kind": "Trigger",
            "metadata": { "name": "t1", "namespace": "ns" },
            "spec": { "broker": "default" }
        }))
        .unwrap()
    }

    #[test]
    fn test_absent_source_is_null_not_omitted() {
        let pair = ResolvedPair {
            trigger: trigger(),
            resolution: SourceResolution::NoMatchingCrd {
                kind: "GcsSource".to_string(),
            },
        };
        let doc = SerializedTriggerAndSource::from_pair(&pair).unwrap();
        assert_eq!(doc.serialized_source, serde_json::Value::Null);

        let value = serde_json::to_value(&doc).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("serialized_source"));
        assert!(object["serialized_source"].is_null());

        let keys: Vec<&String> = object.keys().collect();
        assert_eq!(keys, vec!["serialized_trigger", "serialized_source"]);

        assert!(doc.to_yaml().unwrap().ends_with("\nnull\n"));
    }

    #[test]
    fn test_source_projects_spec_only() {
        let source = Source::from_json(json!({
            "apiVersion": "events.cloud.google.com/v1",
            "kind": "GcsSource",
            "metadata": { "name": "s1", "namespace": "ns" },
            "spec": { "bucket": "b" },
            "status": { "sinkUri": "http://broker" }
        }))
        .unwrap();
        let pair = ResolvedPair {
            trigger: trigger(),
            resolution: SourceResolution::Found(source),
        };

        let doc = SerializedTriggerAndSource::from_pair(&pair).unwrap();
        assert_eq!(doc.serialized_source, json!({ "bucket": "b" }));
        assert_eq!(doc.serialized_trigger["metadata"]["name"], "t1");
        assert_eq!(doc.serialized_trigger["spec"]["broker"], "default");
        assert!(doc.to_yaml().unwrap().ends_with("\nbucket: b\n"));
    }

    #[test]
    fn test_json_output() {
        let pair = ResolvedPair {
            trigger: trigger(),
            resolution: SourceResolution::NoDependency,
        };
        let rendered = SerializedTriggerAndSource::from_pair(&pair)
            .unwrap()
            .to_json()
            .unwrap();

        let trigger_at = rendered.find("\"serialized_trigger\"").unwrap();
        let source_at = rendered.find("\"serialized_source\": null").unwrap();
        assert!(trigger_at < source_at);
        assert!(rendered.starts_with("{\n  \"serialized_trigger\": {\n"));

        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["serialized_trigger"]["metadata"]["name"], "t1");
        assert!(parsed["serialized_source"].is_null());
    }
}
