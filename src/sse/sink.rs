//! Where a call's output goes.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tonic::metadata::MetadataMap;

use crate::error::DispatchError;

use super::metadata::table_description_metadata;
use super::proto::{BundledRows, TableDescription};

#[async_trait]
pub trait ResponseSink: Send {
    async fn send_table_description(
        &mut self,
        description: TableDescription,
    ) -> Result<(), DispatchError>;

    async fn send_rows(&mut self, rows: BundledRows) -> Result<(), DispatchError>;
}

/// One item of a call's response, in send order.
#[derive(Clone, Debug, PartialEq)]
pub enum Outbound {
    TableDescription(TableDescription),
    Rows(BundledRows),
}

impl Outbound {
    /// Response metadata to send ahead of the first row batch, if this item needs any.
    pub fn response_metadata(&self) -> Option<MetadataMap> {
        match self {
            Outbound::TableDescription(desc) => Some(table_description_metadata(desc)),
            Outbound::Rows(_) => None,
        }
    }
}

/// Buffers the whole response in memory.
#[async_trait]
impl ResponseSink for Vec<Outbound> {
    async fn send_table_description(
        &mut self,
        description: TableDescription,
    ) -> Result<(), DispatchError> {
        self.push(Outbound::TableDescription(description));
        Ok(())
    }

    async fn send_rows(&mut self, rows: BundledRows) -> Result<(), DispatchError> {
        self.push(Outbound::Rows(rows));
        Ok(())
    }
}

/// Forwards the response over a bounded channel to the transport task.
///
/// Sends wait for capacity, so at most `capacity` batches are ever queued.
/// A dropped receiver means the host went away; the call ends as cancelled.
pub struct ChannelSink {
    tx: mpsc::Sender<Outbound>,
}

impl ChannelSink {
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Outbound>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    async fn forward(&self, item: Outbound) -> Result<(), DispatchError> {
        self.tx
            .send(item)
            .await
            .map_err(|_| DispatchError::Cancelled)
    }
}

#[async_trait]
impl ResponseSink for ChannelSink {
    async fn send_table_description(
        &mut self,
        description: TableDescription,
    ) -> Result<(), DispatchError> {
        self.forward(Outbound::TableDescription(description)).await
    }

    async fn send_rows(&mut self, rows: BundledRows) -> Result<(), DispatchError> {
        self.forward(Outbound::Rows(rows)).await
    }
}
