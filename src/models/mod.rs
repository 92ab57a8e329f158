//! Eventing resource models
//!
//! Typed wrappers around the dynamic Kubernetes objects this crate reads:
//! Triggers, event-source CRDs and event-source instances.

mod source;
mod trigger;

pub use source::{SOURCE_CRD_LABEL, Source, SourceCrd, SourceReference};
pub use trigger::{
    DEPENDENCY_ANNOTATION, SourceStub, TRIGGER_GROUP, TRIGGER_KIND, TRIGGER_PLURAL, TRIGGER_VERSION,
    Trigger, TriggerReference,
};
