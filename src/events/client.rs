//! Connection-scoped client seam
//!
//! Correlation code only talks to [`EventsClient`]; the Kubernetes-backed
//! implementation lives in `crate::kube::events_client`. A client is opened
//! through a [`Connector`] and held by a [`Connection`] guard, which releases
//! it on drop so every exit path closes the connection.

use anyhow::Result;
use async_trait::async_trait;
use std::ops::Deref;

use crate::models::{Source, SourceCrd, SourceReference, Trigger, TriggerReference};
use crate::platform::ConnectionContext;

/// Read-only operations needed to describe a trigger
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventsClient: Send + Sync {
    /// Fetch a Trigger, `None` when it does not exist
    async fn get_trigger(&self, trigger_ref: &TriggerReference) -> Result<Option<Trigger>>;

    /// List every CRD currently registered as an event source, in server order
    async fn list_source_crds(&self) -> Result<Vec<SourceCrd>>;

    /// Fetch a source instance, `None` when it does not exist
    async fn get_source(
        &self,
        source_ref: &SourceReference,
        crd: &SourceCrd,
    ) -> Result<Option<Source>>;

    /// Release the underlying connection
    fn release(&self);
}

/// Opens an [`EventsClient`] for a connection context
#[async_trait]
pub trait Connector: Send + Sync {
    type Client: EventsClient;

    async fn connect(&self, ctx: &ConnectionContext) -> Result<Self::Client>;
}

/// Scoped handle on an open client
pub struct Connection<C: EventsClient> {
    client: C,
}

impl<C: EventsClient> Connection<C> {
    pub async fn open<K>(connector: &K, ctx: &ConnectionContext) -> Result<Self>
    where
        K: Connector<Client = C>,
    {
        let client = connector.connect(ctx).await?;
        tracing::debug!("Opened connection to {}", ctx);
        Ok(Self { client })
    }
}

impl<C: EventsClient> Deref for Connection<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.client
    }
}

impl<C: EventsClient> Drop for Connection<C> {
    fn drop(&mut self) {
        self.client.release();
        tracing::debug!("Released connection");
    }
}
