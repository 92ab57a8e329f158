//! Trigger describe
//!
//! Resolves a Trigger to the event source it consumes from. The platform gate
//! runs first, then a scoped connection is opened and the correlator runs
//! against it; the connection is released however resolution ends.

mod client;
mod correlator;
mod error;
mod serialize;

#[cfg(test)]
pub use client::MockEventsClient;
pub use client::{Connection, Connector, EventsClient};
pub use correlator::{ResolvedPair, SourceResolution, find_source_crd, resolve};
pub use error::{EventsError, EventsResult};
pub use serialize::SerializedTriggerAndSource;

use tokio_util::sync::CancellationToken;

use crate::models::TriggerReference;
use crate::platform::ConnectionContext;

/// Describe a trigger on the platform selected by `ctx`
pub async fn describe_trigger<K>(
    connector: &K,
    ctx: &ConnectionContext,
    trigger_ref: &TriggerReference,
    cancel: &CancellationToken,
) -> EventsResult<ResolvedPair>
where
    K: Connector,
{
    ctx.ensure_events_supported()?;

    let connection = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(EventsError::Cancelled),
        opened = Connection::<K::Client>::open(connector, ctx) => opened.map_err(EventsError::Connect)?,
    };

    resolve(&*connection, trigger_ref, cancel).await
}
