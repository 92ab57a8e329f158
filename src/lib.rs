//! eventctl library
//!
//! Describes eventing Triggers and correlates each one with the event source
//! custom resource that feeds it. Source kinds are discovered from the CRDs
//! installed on the cluster at call time.
//!
//! The binary is a thin CLI over this library; the correlation logic can be
//! driven with any [`events::EventsClient`] implementation.

pub mod config;
pub mod events;
pub mod kube;
pub mod models;
pub mod platform;

// Re-export commonly used types for convenience
pub use events::{
    EventsError, ResolvedPair, SerializedTriggerAndSource, SourceResolution, describe_trigger,
    resolve,
};
pub use models::{Source, SourceCrd, SourceReference, Trigger, TriggerReference};
pub use platform::{ConnectionContext, Platform, PlatformArgs};
